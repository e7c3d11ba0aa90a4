//! Configuration for FlatStore
//!
//! Every file the store touches is injected here; nothing else in the crate
//! hardcodes a path.

use std::path::{Path, PathBuf};

/// Main configuration for a FlatStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Locations
    // -------------------------------------------------------------------------
    /// Backing file holding the header and all record slots
    pub store_path: PathBuf,

    /// Destination of `backup()` and source of `restore()`
    pub backup_path: PathBuf,

    /// Destination of `export_csv()`
    pub export_path: PathBuf,

    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// Slot count of a freshly created (or cleared) store
    pub initial_capacity: u32,

    /// Grow once a pending insert would push `count` above
    /// `max_load_factor * capacity`
    pub max_load_factor: f64,
}

impl Config {
    // =========================================================================
    // File Name Constants (used by `data_dir`)
    // =========================================================================
    pub const STORE_FILENAME: &'static str = "store.db";
    pub const BACKUP_FILENAME: &'static str = "store_backup.db";
    pub const EXPORT_FILENAME: &'static str = "data.csv";

    pub const DEFAULT_CAPACITY: u32 = 100;
    pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config with all three files placed inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::builder().data_dir(dir).build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(Self::STORE_FILENAME),
            backup_path: PathBuf::from(Self::BACKUP_FILENAME),
            export_path: PathBuf::from(Self::EXPORT_FILENAME),
            initial_capacity: Self::DEFAULT_CAPACITY,
            max_load_factor: Self::DEFAULT_LOAD_FACTOR,
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Place the store, backup and export files inside one directory
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.config.store_path = dir.join(Config::STORE_FILENAME);
        self.config.backup_path = dir.join(Config::BACKUP_FILENAME);
        self.config.export_path = dir.join(Config::EXPORT_FILENAME);
        self
    }

    /// Set the backing store file
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Set the backup file
    pub fn backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backup_path = path.into();
        self
    }

    /// Set the CSV export file
    pub fn export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.export_path = path.into();
        self
    }

    /// Set the capacity used for new and cleared stores
    pub fn initial_capacity(mut self, capacity: u32) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the load factor that triggers a rehash
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.config.max_load_factor = factor;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
