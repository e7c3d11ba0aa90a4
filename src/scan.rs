//! Scan Engine
//!
//! Full-table linear scans over non-key attributes. No hashing and no early
//! termination: every scan reads all `capacity` slots exactly once, skipping
//! never-used and tombstoned slots.

use crate::error::Result;
use crate::record::{Record, Slot};
use crate::storage::SlotFile;

/// Two prices are equal when they differ by less than this
pub const PRICE_EPSILON: f64 = 1e-9;

/// A predicate on one non-key field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldQuery {
    /// Byte-for-byte equality with the stored (truncated) title
    Title(String),
    /// `|stored - value| < PRICE_EPSILON`
    Price(f64),
    /// Exact equality
    Quantity(i32),
}

impl FieldQuery {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FieldQuery::Title(title) => record.title.as_bytes() == title.as_bytes(),
            FieldQuery::Price(price) => (record.price - price).abs() < PRICE_EPSILON,
            FieldQuery::Quantity(quantity) => record.quantity == *quantity,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldQuery::Title(_) => "title",
            FieldQuery::Price(_) => "price",
            FieldQuery::Quantity(_) => "quantity",
        }
    }
}

/// Every live record, in slot order
pub fn live_records(file: &mut SlotFile) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for item in file.slots()? {
        let (_, slot) = item?;
        if let Some(record) = slot.into_record() {
            records.push(record);
        }
    }
    Ok(records)
}

/// Every live record matching `query`, in slot order
pub fn find_matching(file: &mut SlotFile, query: &FieldQuery) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for item in file.slots()? {
        let (_, slot) = item?;
        if let Some(record) = slot.into_record() {
            if query.matches(&record) {
                records.push(record);
            }
        }
    }
    Ok(records)
}

/// Tombstone every live slot matching `query` and return how many were hit.
///
/// Only slots are written; the caller owns the header and must decrement
/// `count` by the returned amount and persist it.
pub fn tombstone_matching(file: &mut SlotFile, query: &FieldQuery) -> Result<usize> {
    let mut hits: Vec<(u32, Slot)> = Vec::new();
    for item in file.slots()? {
        let (index, slot) = item?;
        let matched = slot
            .to_record()
            .is_some_and(|record| query.matches(&record));
        if matched {
            hits.push((index, slot));
        }
    }

    let matched = hits.len();
    for (index, mut slot) in hits {
        slot.tombstone();
        file.write_slot(index, &slot)?;
    }

    Ok(matched)
}
