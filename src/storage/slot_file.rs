//! Slot File
//!
//! A handle on the backing file with index-addressed slot reads and writes.
//! Handles are short-lived: the engine opens one per operation and drops it
//! before returning.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::{Slot, SLOT_SIZE};

use super::{Header, HEADER_SIZE};

/// Open backing file plus the capacity it was opened with
pub struct SlotFile {
    file: File,
    capacity: u32,
}

impl SlotFile {
    /// Create (or truncate) a store file with `capacity` never-used slots
    pub fn create(path: &Path, capacity: u32) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| StoreError::unavailable(path, e))?;

        let mut writer = BufWriter::new(file);

        writer.write_all(&Header::empty(capacity).encode())?;

        let never_used = Slot::never_used().encode();
        for _ in 0..capacity {
            writer.write_all(&never_used)?;
        }

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        Ok(Self { file, capacity })
    }

    /// Open an existing store file, reading and validating its header
    pub fn load(path: &Path) -> Result<(Self, Header)> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| StoreError::unavailable(path, e))?;

        let mut slot_file = Self { file, capacity: 0 };
        let header = slot_file.read_header().map_err(|e| match e {
            StoreError::Io(e) => {
                StoreError::Corrupt(format!("Cannot read header of {}: {}", path.display(), e))
            }
            other => other,
        })?;

        let actual_len = slot_file.file.metadata()?.len();
        if actual_len != header.file_len() {
            return Err(StoreError::Corrupt(format!(
                "File length {} does not match capacity {} (expected {} bytes)",
                actual_len,
                header.capacity,
                header.file_len()
            )));
        }

        slot_file.capacity = header.capacity;
        Ok((slot_file, header))
    }

    /// Open for reads only, trusting the cached capacity
    pub fn open_read(path: &Path, capacity: u32) -> Result<Self> {
        let file = File::open(path).map_err(|e| StoreError::unavailable(path, e))?;
        Ok(Self { file, capacity })
    }

    /// Open for reads and writes, trusting the cached capacity
    pub fn open_write(path: &Path, capacity: u32) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| StoreError::unavailable(path, e))?;
        Ok(Self { file, capacity })
    }

    // =========================================================================
    // Header
    // =========================================================================

    pub fn read_header(&mut self) -> Result<Header> {
        let mut bytes = [0u8; HEADER_SIZE as usize];
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_exact(&mut bytes)?;
        Header::decode(&bytes)
    }

    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header.encode())?;
        Ok(())
    }

    // =========================================================================
    // Slots
    // =========================================================================

    pub fn read_slot(&mut self, index: u32) -> Result<Slot> {
        let offset = self.slot_offset(index)?;
        let mut bytes = [0u8; SLOT_SIZE];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut bytes)?;
        Slot::decode(&bytes)
    }

    pub fn write_slot(&mut self, index: u32, slot: &Slot) -> Result<()> {
        let offset = self.slot_offset(index)?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&slot.encode())?;
        Ok(())
    }

    /// Sequential pass over every slot, in index order
    pub fn slots(&mut self) -> Result<SlotIter<'_>> {
        self.file.seek(SeekFrom::Start(HEADER_SIZE))?;
        Ok(SlotIter {
            reader: BufReader::new(&mut self.file),
            next_index: 0,
            capacity: self.capacity,
        })
    }

    /// Flush file contents to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn slot_offset(&self, index: u32) -> Result<u64> {
        if index >= self.capacity {
            return Err(StoreError::Corrupt(format!(
                "Slot index {} out of range (capacity {})",
                index, self.capacity
            )));
        }
        Ok(HEADER_SIZE + index as u64 * SLOT_SIZE as u64)
    }
}

/// Iterator over `(index, slot)` pairs of a [`SlotFile`]
pub struct SlotIter<'a> {
    reader: BufReader<&'a mut File>,
    next_index: u32,
    capacity: u32,
}

impl<'a> Iterator for SlotIter<'a> {
    type Item = Result<(u32, Slot)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.capacity {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;

        let mut bytes = [0u8; SLOT_SIZE];
        if let Err(e) = self.reader.read_exact(&mut bytes) {
            // Stop after the first failure
            self.next_index = self.capacity;
            return Some(Err(StoreError::Io(e)));
        }

        Some(Slot::decode(&bytes).map(|slot| (index, slot)))
    }
}
