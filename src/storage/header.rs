//! File header
//!
//! Two little-endian i32 fields: capacity, then live count.

use crate::error::{Result, StoreError};

/// Header size: Capacity (4) + Count (4) = 8 bytes
pub const HEADER_SIZE: u64 = 8;

/// Persisted table metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Total slot count
    pub capacity: u32,
    /// Live (non-tombstoned) records
    pub count: u32,
}

impl Header {
    /// Header of a freshly created, empty table
    pub fn empty(capacity: u32) -> Self {
        Self { capacity, count: 0 }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE as usize] {
        let mut out = [0u8; HEADER_SIZE as usize];
        out[0..4].copy_from_slice(&(self.capacity as i32).to_le_bytes());
        out[4..8].copy_from_slice(&(self.count as i32).to_le_bytes());
        out
    }

    /// Decode and validate a header read from disk
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE as usize {
            return Err(StoreError::Corrupt(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let capacity = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let count = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        if capacity <= 0 {
            return Err(StoreError::Corrupt(format!(
                "Invalid capacity in header: {}",
                capacity
            )));
        }
        if count < 0 || count > capacity {
            return Err(StoreError::Corrupt(format!(
                "Invalid count in header: {} (capacity {})",
                count, capacity
            )));
        }

        Ok(Self {
            capacity: capacity as u32,
            count: count as u32,
        })
    }

    /// Expected length of a file described by this header
    pub fn file_len(&self) -> u64 {
        HEADER_SIZE + self.capacity as u64 * crate::record::SLOT_SIZE as u64
    }
}
