//! Hash Index
//!
//! Maps an id to its home slot and yields the linear probe sequence
//! `(home + i) mod capacity` for `i in 0..capacity`.

use std::iter::FusedIterator;

use crate::error::{Result, StoreError};

/// Home-slot computation for one table capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashIndex {
    capacity: u32,
}

impl HashIndex {
    /// Fails with `NotInitialized` for a zero-capacity (dropped) table
    pub fn new(capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(StoreError::NotInitialized);
        }
        Ok(Self { capacity })
    }

    /// `|id| mod capacity`
    pub fn home_slot(&self, id: i32) -> u32 {
        id.unsigned_abs() % self.capacity
    }

    /// Every slot index, starting at the home slot and wrapping once
    pub fn probe(&self, id: i32) -> ProbeSequence {
        ProbeSequence {
            home: self.home_slot(id),
            step: 0,
            capacity: self.capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// Linear probe sequence of exactly `capacity` slot indices
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    home: u32,
    step: u32,
    capacity: u32,
}

impl Iterator for ProbeSequence {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.step >= self.capacity {
            return None;
        }
        let slot = ((self.home as u64 + self.step as u64) % self.capacity as u64) as u32;
        self.step += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.capacity - self.step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

impl FusedIterator for ProbeSequence {}
