//! In-memory ordered survey list.
//!
//! # Responsibility
//! - Own the list the UI renders and the service persists.
//! - Resolve positional and stable-id targets.
//!
//! # Invariants
//! - Order is insertion order.
//! - `replace` keeps the element position; `remove` shifts later elements left.
//! - A target that no longer resolves is an error, never a silent no-op.

use crate::model::survey::{SurveyId, SurveyRecord};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Addresses one record either by list row or by stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyTarget {
    Index(usize),
    Id(SurveyId),
}

impl From<usize> for SurveyTarget {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<SurveyId> for SurveyTarget {
    fn from(value: SurveyId) -> Self {
        Self::Id(value)
    }
}

impl Display for SurveyTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index {index}"),
            Self::Id(id) => write!(f, "id {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Target does not resolve to a record in the current list.
    NotFound(SurveyTarget),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(target) => write!(f, "survey not found: {target}"),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyStore {
    records: Vec<SurveyRecord>,
}

impl SurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SurveyRecord> {
        self.records.get(index)
    }

    pub fn position(&self, id: SurveyId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Resolves a target to its current row.
    pub fn resolve(&self, target: SurveyTarget) -> StoreResult<usize> {
        let index = match target {
            SurveyTarget::Index(index) if index < self.records.len() => Some(index),
            SurveyTarget::Index(_) => None,
            SurveyTarget::Id(id) => self.position(id),
        };
        index.ok_or(StoreError::NotFound(target))
    }

    /// Appends to the end of the list.
    pub fn push(&mut self, record: SurveyRecord) {
        self.records.push(record);
    }

    /// Replaces the targeted record in place and returns the previous value.
    pub fn replace(
        &mut self,
        target: SurveyTarget,
        record: SurveyRecord,
    ) -> StoreResult<SurveyRecord> {
        let index = self.resolve(target)?;
        Ok(std::mem::replace(&mut self.records[index], record))
    }

    /// Removes the targeted record.
    pub fn remove(&mut self, target: SurveyTarget) -> StoreResult<SurveyRecord> {
        let index = self.resolve(target)?;
        Ok(self.records.remove(index))
    }

    /// Replaces the whole list.
    pub fn reset(&mut self, records: Vec<SurveyRecord>) {
        self.records = records;
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, SurveyStore, SurveyTarget};
    use crate::model::survey::SurveyRecord;

    fn named(address: &str) -> SurveyRecord {
        let mut record = SurveyRecord::new("t");
        record.address = address.to_string();
        record
    }

    fn addresses(store: &SurveyStore) -> Vec<&str> {
        store.records().iter().map(|r| r.address.as_str()).collect()
    }

    #[test]
    fn push_keeps_call_order() {
        let mut store = SurveyStore::new();
        for name in ["a", "b", "c"] {
            store.push(named(name));
        }
        assert_eq!(store.len(), 3);
        assert_eq!(addresses(&store), ["a", "b", "c"]);
    }

    #[test]
    fn replace_keeps_position_and_neighbours() {
        let mut store = SurveyStore::from_records(vec![named("a"), named("b"), named("c")]);
        let replacement = named("B");
        store
            .replace(SurveyTarget::Index(1), replacement.clone())
            .unwrap();

        assert_eq!(store.get(1), Some(&replacement));
        assert_eq!(addresses(&store), ["a", "B", "c"]);
    }

    #[test]
    fn remove_shifts_later_records_left() {
        let mut store = SurveyStore::from_records(vec![named("a"), named("b"), named("c")]);
        let c_id = store.get(2).unwrap().id;

        let removed = store.remove(SurveyTarget::Index(0)).unwrap();

        assert_eq!(removed.address, "a");
        assert_eq!(store.len(), 2);
        assert_eq!(store.position(c_id), Some(1));
    }

    #[test]
    fn stale_targets_are_errors() {
        let mut store = SurveyStore::from_records(vec![named("a")]);
        let gone = store.get(0).unwrap().id;
        store.remove(SurveyTarget::Id(gone)).unwrap();

        assert_eq!(
            store.remove(SurveyTarget::Id(gone)),
            Err(StoreError::NotFound(SurveyTarget::Id(gone)))
        );
        assert!(store.replace(SurveyTarget::Index(0), named("x")).is_err());
    }
}
