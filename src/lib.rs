//! # FlatStore
//!
//! A persistent record store in a single flat file:
//! - Open-addressing hash index on an integer id (linear probing)
//! - Tombstone deletes that keep probe chains intact
//! - Doubling rehash once the load factor passes 0.7
//! - Linear-scan queries and deletes on title, price and quantity
//! - Whole-file backup/restore and CSV export
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Embedding request layer                     │
//! │              (optionally through SharedStore)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store (engine)                        │
//! │      keyed ops · rehash · field scans · maintenance          │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!   ┌─────────────┐      ┌─────────────┐       ┌─────────────┐
//!   │  HashIndex  │      │    Scan     │       │ Maintenance │
//!   │  (probing)  │      │ (full pass) │       │ (copy, CSV) │
//!   └─────────────┘      └──────┬──────┘       └─────────────┘
//!                               │
//!                               ▼
//!                  ┌─────────────────────────┐
//!                  │  SlotFile + Header      │
//!                  │  (fixed-width slots)    │
//!                  └─────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod index;
pub mod scan;
pub mod maintenance;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use engine::{InsertOutcome, Lookup, Store};
pub use record::{Record, Title};
pub use scan::FieldQuery;
pub use shared::SharedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FlatStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
