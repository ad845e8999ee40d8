//! In-memory [`EntryStore`] implementation.
//!
//! Reference semantics for the merge-upsert contract: create-or-field-merge
//! keyed by date, never a whole-document overwrite. Used by pipeline tests and
//! anywhere a run should not touch real storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::{Entry, EntryStore, EntryUpdate, StoreError};

/// Entry store backed by a process-local map. Cheap to construct per test.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: Mutex<HashMap<NaiveDate, Entry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entry stored for `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<Entry> {
        self.entries.lock().unwrap().get(&date).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn merge(&self, update: &EntryUpdate) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry(update.date)
            .or_insert_with(|| Entry::empty(update.date))
            .apply(update);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Entry>, StoreError> {
        let entries = self.entries.lock().unwrap();
        let mut all: Vec<Entry> = entries.values().cloned().collect();
        all.sort_by_key(|e| e.date);
        Ok(all)
    }
}
