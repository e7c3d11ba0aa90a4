//! Slot codec
//!
//! Fixed-width binary encoding of one record slot. The layout is spelled out
//! field by field so it never depends on in-memory struct packing.

use bytes::{Buf, BufMut};

use crate::error::{Result, StoreError};

use super::{Record, Title};

/// Width of the title field, terminator included
pub const TITLE_FIELD_SIZE: usize = 64;

/// id (4) + title (64) + price (8) + quantity (4) + deleted (1) + padding (7)
pub const SLOT_SIZE: usize = 88;

const PADDING_SIZE: usize = SLOT_SIZE - (4 + TITLE_FIELD_SIZE + 8 + 4 + 1);

/// Which of the three slot states a slot is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// `deleted = true, id = 0`: nothing was ever stored here
    NeverUsed,
    /// `deleted = true, id = <last occupant>`: probes must walk past it
    Tombstone,
    /// `deleted = false`: holds a record
    Live,
}

/// One on-disk slot, live or not
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: i32,
    pub title: Title,
    pub price: f64,
    pub quantity: i32,
    pub deleted: bool,
}

impl Slot {
    /// The slot every fresh store is filled with
    pub fn never_used() -> Self {
        Self {
            id: 0,
            title: Title::default(),
            price: 0.0,
            quantity: 0,
            deleted: true,
        }
    }

    /// A live slot holding `record`
    pub fn live(record: &Record) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            price: record.price,
            quantity: record.quantity,
            deleted: false,
        }
    }

    pub fn state(&self) -> SlotState {
        match (self.deleted, self.id) {
            (false, _) => SlotState::Live,
            (true, 0) => SlotState::NeverUsed,
            (true, _) => SlotState::Tombstone,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.deleted
    }

    pub fn is_never_used(&self) -> bool {
        self.state() == SlotState::NeverUsed
    }

    /// Flip the deleted flag; the id stays so probe chains remain intact
    pub fn tombstone(&mut self) {
        self.deleted = true;
    }

    /// The record held by a live slot
    pub fn to_record(&self) -> Option<Record> {
        self.is_live().then(|| Record {
            id: self.id,
            title: self.title.clone(),
            price: self.price,
            quantity: self.quantity,
        })
    }

    pub fn into_record(self) -> Option<Record> {
        if self.deleted {
            return None;
        }
        Some(Record {
            id: self.id,
            title: self.title,
            price: self.price,
            quantity: self.quantity,
        })
    }

    /// Encode to exactly [`SLOT_SIZE`] bytes
    pub fn encode(&self) -> [u8; SLOT_SIZE] {
        let mut out = [0u8; SLOT_SIZE];
        let mut buf = &mut out[..];

        let title = self.title.as_bytes();

        buf.put_i32_le(self.id);
        buf.put_slice(title);
        buf.put_bytes(0, TITLE_FIELD_SIZE - title.len());
        buf.put_f64_le(self.price);
        buf.put_i32_le(self.quantity);
        buf.put_u8(u8::from(self.deleted));
        buf.put_bytes(0, PADDING_SIZE);

        out
    }

    /// Decode a slot; any non-zero deleted byte reads as deleted
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SLOT_SIZE {
            return Err(StoreError::Corrupt(format!(
                "Incomplete slot: expected {} bytes, got {}",
                SLOT_SIZE,
                bytes.len()
            )));
        }

        let mut buf = &bytes[..SLOT_SIZE];

        let id = buf.get_i32_le();
        let title = Title::from_field(&buf[..TITLE_FIELD_SIZE]);
        buf.advance(TITLE_FIELD_SIZE);
        let price = buf.get_f64_le();
        let quantity = buf.get_i32_le();
        let deleted = buf.get_u8() != 0;

        Ok(Self {
            id,
            title,
            price,
            quantity,
            deleted,
        })
    }
}
