//! Engine Module
//!
//! The storage engine that coordinates the slot file, the hash index and
//! the scan engine.
//!
//! ## Responsibilities
//! - Create or adopt the backing file on startup
//! - Keyed insert / lookup / delete / update through linear probing
//! - Grow the table (full rehash) before it passes its load factor
//! - Field scans, export, backup/restore and reset
//! - Keep the cached header equal to the on-disk header after every call

use std::fs;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::index::HashIndex;
use crate::maintenance;
use crate::record::{Record, Slot, SlotState};
use crate::scan::{self, FieldQuery};
use crate::storage::{Header, SlotFile};

/// Largest capacity whose header still fits in an i32
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Result of an insert; failures here are ordinary outcomes, not errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The id was zero or negative
    InvalidKey,
    /// A live record already uses this id
    DuplicateKey,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

/// Result of a point lookup by id
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub record: Option<Record>,
    /// Slots examined, hit or miss
    pub probes: u32,
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        self.record.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Placed,
    Duplicate,
    Full,
}

/// The record store
///
/// ## Concurrency Model
///
/// None. Every call opens the backing file, does blocking I/O and closes it
/// again; only the header is cached between calls. Callers that share a
/// store across threads must serialize access, see
/// [`SharedStore`](crate::shared::SharedStore).
pub struct Store {
    config: Config,

    /// Mirror of the on-disk header; all zero after `drop_store`
    header: Header,
}

impl Store {
    /// Open the store at `config.store_path`, creating it if missing
    pub fn open(config: Config) -> Result<Self> {
        Self::validate(&config)?;

        let header = if config.store_path.exists() {
            let (_, header) = SlotFile::load(&config.store_path)?;
            tracing::info!(
                capacity = header.capacity,
                count = header.count,
                "Opened store {}",
                config.store_path.display()
            );
            header
        } else {
            SlotFile::create(&config.store_path, config.initial_capacity)?;
            tracing::info!(
                capacity = config.initial_capacity,
                "Created store {}",
                config.store_path.display()
            );
            Header::empty(config.initial_capacity)
        };

        Ok(Self { config, header })
    }

    /// Recreate an empty store, but only if no backing file exists
    pub fn create(&mut self) -> Result<bool> {
        if self.config.store_path.exists() {
            return Ok(false);
        }
        self.reset(self.config.initial_capacity)?;
        tracing::info!("Created store {}", self.config.store_path.display());
        Ok(true)
    }

    /// Remove the backing file; keyed operations fail until recreated
    pub fn drop_store(&mut self) -> Result<()> {
        if self.config.store_path.exists() {
            fs::remove_file(&self.config.store_path)?;
        }
        self.header = Header::default();
        tracing::info!("Dropped store {}", self.config.store_path.display());
        Ok(())
    }

    // =========================================================================
    // Keyed Operations
    // =========================================================================

    /// Insert a new record.
    ///
    /// Grows the table first when this insert would push the live count
    /// above `max_load_factor * capacity`. The whole probe chain is checked
    /// for a live duplicate before the first free slot is taken.
    pub fn insert(
        &mut self,
        id: i32,
        title: &str,
        price: f64,
        quantity: i32,
    ) -> Result<InsertOutcome> {
        if id <= 0 {
            tracing::debug!(id, "Rejected insert: invalid key");
            return Ok(InsertOutcome::InvalidKey);
        }
        self.ensure_initialized()?;

        let record = Record::new(id, title, price, quantity);

        if self.needs_growth() {
            self.rehash()?;
        }

        let placement = match self.place(&record)? {
            Placement::Full => {
                tracing::warn!(id, capacity = self.header.capacity, "No free slot, forcing rehash");
                self.rehash()?;
                self.place(&record)?
            }
            placement => placement,
        };

        match placement {
            Placement::Placed => {
                tracing::debug!(id, count = self.header.count, "Inserted record");
                Ok(InsertOutcome::Inserted)
            }
            Placement::Duplicate => {
                tracing::debug!(id, "Rejected insert: duplicate key");
                Ok(InsertOutcome::DuplicateKey)
            }
            Placement::Full => Err(StoreError::Corrupt(format!(
                "No free slot for id {} after rehash to capacity {}",
                id, self.header.capacity
            ))),
        }
    }

    /// Point lookup; reports the number of slots examined either way
    pub fn find_by_id(&self, id: i32) -> Result<Lookup> {
        let index = HashIndex::new(self.header.capacity)?;
        let mut file = SlotFile::open_read(&self.config.store_path, self.header.capacity)?;

        let (found, probes) = Self::locate(&mut file, index, id)?;

        Ok(Lookup {
            record: found.and_then(|(_, slot)| slot.into_record()),
            probes,
        })
    }

    /// Tombstone the record with this id
    pub fn delete_by_id(&mut self, id: i32) -> Result<bool> {
        let index = HashIndex::new(self.header.capacity)?;
        let mut file = SlotFile::open_write(&self.config.store_path, self.header.capacity)?;

        let Some((slot_index, mut slot)) = Self::locate(&mut file, index, id)?.0 else {
            return Ok(false);
        };

        slot.tombstone();
        file.write_slot(slot_index, &slot)?;

        self.header.count = self.header.count.saturating_sub(1);
        file.write_header(&self.header)?;

        tracing::debug!(id, count = self.header.count, "Deleted record");
        Ok(true)
    }

    /// Overwrite title, price and quantity of an existing record in place
    pub fn update(&mut self, id: i32, title: &str, price: f64, quantity: i32) -> Result<bool> {
        let index = HashIndex::new(self.header.capacity)?;
        let mut file = SlotFile::open_write(&self.config.store_path, self.header.capacity)?;

        let Some((slot_index, slot)) = Self::locate(&mut file, index, id)?.0 else {
            return Ok(false);
        };

        let updated = Slot {
            title: title.into(),
            price,
            quantity,
            ..slot
        };
        file.write_slot(slot_index, &updated)?;

        tracing::debug!(id, "Updated record");
        Ok(true)
    }

    // =========================================================================
    // Field Scans
    // =========================================================================

    pub fn find_by(&self, query: &FieldQuery) -> Result<Vec<Record>> {
        self.ensure_initialized()?;
        let mut file = SlotFile::open_read(&self.config.store_path, self.header.capacity)?;
        scan::find_matching(&mut file, query)
    }

    pub fn find_by_title(&self, title: &str) -> Result<Vec<Record>> {
        self.find_by(&FieldQuery::Title(title.to_string()))
    }

    pub fn find_by_price(&self, price: f64) -> Result<Vec<Record>> {
        self.find_by(&FieldQuery::Price(price))
    }

    pub fn find_by_quantity(&self, quantity: i32) -> Result<Vec<Record>> {
        self.find_by(&FieldQuery::Quantity(quantity))
    }

    /// Tombstone every matching record; the header is written once at the end
    pub fn delete_by(&mut self, query: &FieldQuery) -> Result<usize> {
        self.ensure_initialized()?;
        let mut file = SlotFile::open_write(&self.config.store_path, self.header.capacity)?;

        let deleted = scan::tombstone_matching(&mut file, query)?;

        self.header.count = self.header.count.saturating_sub(deleted as u32);
        file.write_header(&self.header)?;

        tracing::debug!(
            field = query.field_name(),
            deleted,
            count = self.header.count,
            "Deleted records by field"
        );
        Ok(deleted)
    }

    pub fn delete_by_title(&mut self, title: &str) -> Result<usize> {
        self.delete_by(&FieldQuery::Title(title.to_string()))
    }

    pub fn delete_by_price(&mut self, price: f64) -> Result<usize> {
        self.delete_by(&FieldQuery::Price(price))
    }

    pub fn delete_by_quantity(&mut self, quantity: i32) -> Result<usize> {
        self.delete_by(&FieldQuery::Quantity(quantity))
    }

    /// Every live record in on-disk slot order
    pub fn get_all(&self) -> Result<Vec<Record>> {
        self.ensure_initialized()?;
        let mut file = SlotFile::open_read(&self.config.store_path, self.header.capacity)?;
        scan::live_records(&mut file)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Discard everything and start over at the configured initial capacity
    pub fn clear(&mut self) -> Result<()> {
        self.reset(self.config.initial_capacity)?;
        tracing::info!(capacity = self.header.capacity, "Cleared store");
        Ok(())
    }

    /// Copy the store file to the backup path. Failures are logged, not raised.
    pub fn backup(&self) -> bool {
        match maintenance::copy_verified(&self.config.store_path, &self.config.backup_path) {
            Ok(crc) => {
                tracing::info!(
                    crc = %format!("{:08x}", crc),
                    "Backed up store to {}",
                    self.config.backup_path.display()
                );
                true
            }
            Err(e) => {
                tracing::warn!("Couldn't back up store: {}", e);
                false
            }
        }
    }

    /// Copy the backup over the store file and adopt its header.
    ///
    /// The backup is validated first; a missing, truncated or malformed
    /// backup is an error and leaves the live store untouched.
    pub fn restore(&mut self) -> Result<()> {
        let (_, header) = SlotFile::load(&self.config.backup_path).map_err(|e| {
            StoreError::MaintenanceFailure(format!(
                "Cannot read backup {}: {}",
                self.config.backup_path.display(),
                e
            ))
        })?;

        let crc = match maintenance::copy_verified(&self.config.backup_path, &self.config.store_path) {
            Ok(crc) => crc,
            Err(e) => {
                tracing::warn!("Couldn't restore store from backup: {}", e);
                self.header = SlotFile::load(&self.config.store_path)
                    .map(|(_, header)| header)
                    .unwrap_or_default();
                return Err(e);
            }
        };
        self.header = header;

        tracing::info!(
            capacity = header.capacity,
            count = header.count,
            crc = %format!("{:08x}", crc),
            "Restored store from {}",
            self.config.backup_path.display()
        );
        Ok(())
    }

    /// All live records as CSV text
    pub fn export_all(&self) -> Result<String> {
        let records = self.get_all()?;
        Ok(maintenance::render_csv(&records))
    }

    /// Write `export_all()` to the export path; returns the number of rows
    pub fn export_csv(&self) -> Result<usize> {
        let records = self.get_all()?;
        fs::write(&self.config.export_path, maintenance::render_csv(&records))?;

        tracing::info!(
            rows = records.len(),
            "Exported store to {}",
            self.config.export_path.display()
        );
        Ok(records.len())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn capacity(&self) -> u32 {
        self.header.capacity
    }

    pub fn count(&self) -> u32 {
        self.header.count
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn is_initialized(&self) -> bool {
        self.header.capacity > 0
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn validate(config: &Config) -> Result<()> {
        if config.initial_capacity == 0 || config.initial_capacity > MAX_CAPACITY {
            return Err(StoreError::Config(format!(
                "initial_capacity must be in 1..={}, got {}",
                MAX_CAPACITY, config.initial_capacity
            )));
        }
        let factor = config.max_load_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(StoreError::Config(format!(
                "max_load_factor must be in (0, 1], got {}",
                factor
            )));
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.header.capacity == 0 {
            return Err(StoreError::NotInitialized);
        }
        Ok(())
    }

    fn needs_growth(&self) -> bool {
        (self.header.count as f64 + 1.0)
            > self.config.max_load_factor * self.header.capacity as f64
    }

    /// Truncate the store file to `capacity` never-used slots
    fn reset(&mut self, capacity: u32) -> Result<()> {
        SlotFile::create(&self.config.store_path, capacity)?;
        self.header = Header::empty(capacity);
        Ok(())
    }

    /// Walk the probe chain for `id`.
    ///
    /// Tombstones are skipped; a never-used slot ends the walk. Returns the
    /// live slot holding `id` (if any) and the number of slots examined.
    fn locate(
        file: &mut SlotFile,
        index: HashIndex,
        id: i32,
    ) -> Result<(Option<(u32, Slot)>, u32)> {
        debug_assert_eq!(index.capacity(), file.capacity());
        let mut probes = 0;

        for slot_index in index.probe(id) {
            let slot = file.read_slot(slot_index)?;
            probes += 1;

            if slot.is_never_used() {
                break;
            }
            if slot.is_live() && slot.id == id {
                return Ok((Some((slot_index, slot)), probes));
            }
        }

        Ok((None, probes))
    }

    fn place(&mut self, record: &Record) -> Result<Placement> {
        let index = HashIndex::new(self.header.capacity)?;
        let mut file = SlotFile::open_write(&self.config.store_path, self.header.capacity)?;
        self.place_in(&mut file, index, record)
    }

    /// Write `record` into the first free slot of its probe chain, unless a
    /// live slot further along the chain already holds the same id
    fn place_in(
        &mut self,
        file: &mut SlotFile,
        index: HashIndex,
        record: &Record,
    ) -> Result<Placement> {
        debug_assert_eq!(index.capacity(), file.capacity());
        let mut free = None;

        for slot_index in index.probe(record.id) {
            let slot = file.read_slot(slot_index)?;

            match slot.state() {
                SlotState::Live if slot.id == record.id => return Ok(Placement::Duplicate),
                SlotState::Live => {}
                SlotState::Tombstone => {
                    free.get_or_insert(slot_index);
                }
                SlotState::NeverUsed => {
                    free.get_or_insert(slot_index);
                    break;
                }
            }
        }

        let Some(target) = free else {
            return Ok(Placement::Full);
        };

        file.write_slot(target, &Slot::live(record))?;
        self.header.count += 1;
        file.write_header(&self.header)?;

        Ok(Placement::Placed)
    }

    /// Rebuild the table at double capacity and reinsert every live record
    fn rehash(&mut self) -> Result<()> {
        let old_capacity = self.header.capacity;
        let new_capacity = old_capacity
            .checked_mul(2)
            .filter(|c| *c <= MAX_CAPACITY)
            .ok_or(StoreError::CapacityOverflow { max: MAX_CAPACITY })?;

        let records = {
            let mut file = SlotFile::open_read(&self.config.store_path, old_capacity)?;
            scan::live_records(&mut file)?
        };

        tracing::info!(
            old_capacity,
            new_capacity,
            records = records.len(),
            "Rehashing store"
        );

        self.reset(new_capacity)?;

        let index = HashIndex::new(new_capacity)?;
        let mut file = SlotFile::open_write(&self.config.store_path, new_capacity)?;
        for record in &records {
            if self.place_in(&mut file, index, record)? != Placement::Placed {
                return Err(StoreError::Corrupt(format!(
                    "Record {} could not be reinserted during rehash",
                    record.id
                )));
            }
        }
        file.sync()?;

        Ok(())
    }
}
