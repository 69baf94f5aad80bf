//! Cross-page selection bookkeeping.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Record, RecordId};

/// Every row the user has selected, across all visited pages.
///
/// Keyed by [`RecordId::key`], so it serializes to the same JSON object shape
/// the durable store keeps under `selectedRows`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    rows: BTreeMap<String, Record>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.rows.contains_key(&id.key())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Insert a row. Returns `true` if it was not selected before.
    pub fn insert(&mut self, record: Record) -> bool {
        self.rows.insert(record.key(), record).is_none()
    }

    /// Remove a row. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        self.rows.remove(&id.key()).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.rows.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Make the selection agree with `selected` for the rows of `page`.
    ///
    /// Page rows named in `selected` are inserted, all other page rows are
    /// removed. Rows not on `page` are never touched, and ids in `selected`
    /// that are not on `page` are ignored.
    pub fn reconcile(&mut self, page: &[Record], selected: &[RecordId]) {
        let wanted: HashSet<String> = selected.iter().map(RecordId::key).collect();
        for record in page {
            if wanted.contains(&record.key()) {
                self.rows.insert(record.key(), record.clone());
            } else {
                self.rows.remove(&record.key());
            }
        }
    }

    /// Select up to `budget` rows of `page`, in page order, skipping rows that
    /// are already selected. Returns how many rows were newly added.
    pub fn auto_select(&mut self, page: &[Record], budget: usize) -> usize {
        let mut added = 0;
        for record in page {
            if added >= budget {
                break;
            }
            if self.insert(record.clone()) {
                added += 1;
            }
        }
        added
    }

    /// Rows of `page` that are selected, in page order.
    pub fn visible<'a>(&self, page: &'a [Record]) -> Vec<&'a Record> {
        page.iter().filter(|r| self.contains(&r.id)).collect()
    }
}
