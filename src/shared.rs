//! Shared Store
//!
//! The engine has no internal locking: interleaved inserts, deletes and
//! rehashes from several threads would race on file offsets and on the
//! cached header. `SharedStore` puts the whole engine behind one mutex so a
//! multi-threaded request layer gets a single writer at a time.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::{InsertOutcome, Lookup, Store};
use crate::error::Result;
use crate::record::Record;
use crate::scan::FieldQuery;

/// Cloneable, thread-safe handle to one [`Store`]
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn open(config: Config) -> Result<Self> {
        Store::open(config).map(Self::new)
    }

    /// Run `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    pub fn insert(&self, id: i32, title: &str, price: f64, quantity: i32) -> Result<InsertOutcome> {
        self.with(|store| store.insert(id, title, price, quantity))
    }

    pub fn find_by_id(&self, id: i32) -> Result<Lookup> {
        self.with(|store| store.find_by_id(id))
    }

    pub fn delete_by_id(&self, id: i32) -> Result<bool> {
        self.with(|store| store.delete_by_id(id))
    }

    pub fn update(&self, id: i32, title: &str, price: f64, quantity: i32) -> Result<bool> {
        self.with(|store| store.update(id, title, price, quantity))
    }

    pub fn find_by(&self, query: &FieldQuery) -> Result<Vec<Record>> {
        self.with(|store| store.find_by(query))
    }

    pub fn delete_by(&self, query: &FieldQuery) -> Result<usize> {
        self.with(|store| store.delete_by(query))
    }

    pub fn get_all(&self) -> Result<Vec<Record>> {
        self.with(|store| store.get_all())
    }

    pub fn count(&self) -> u32 {
        self.with(|store| store.count())
    }

    pub fn capacity(&self) -> u32 {
        self.with(|store| store.capacity())
    }
}
