//! Storage Module
//!
//! The single backing file: an 8-byte header followed by `capacity`
//! fixed-size slots, addressed by index.
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header (8 bytes)                       │
//! │ ┌──────────────────┬─────────────────┐ │
//! │ │ Capacity (i32 LE)│ Count (i32 LE)  │ │
//! │ └──────────────────┴─────────────────┘ │
//! ├────────────────────────────────────────┤
//! │ Slot 0 (88 bytes)                      │
//! │ Slot 1                                 │
//! │ ...                                    │
//! │ Slot capacity-1                        │
//! └────────────────────────────────────────┘
//! ```
//!
//! Slot `i` lives at byte offset `8 + i * 88`. A new file has every slot in
//! the never-used state (`deleted = 1, id = 0`).

mod header;
mod slot_file;

pub use header::{Header, HEADER_SIZE};
pub use slot_file::{SlotFile, SlotIter};
