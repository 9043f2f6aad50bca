//! Survey list persistence over a key-value slot.
//!
//! # Responsibility
//! - Serialize the whole survey list into the `surveys` slot.
//! - Restore the list once at startup.
//!
//! # Invariants
//! - Writes are wholesale overwrites of the full list, never incremental.
//! - An absent slot is distinct from an empty list.
//! - A malformed payload is reported, never silently replaced.

use crate::model::survey::SurveyRecord;
use crate::repo::kv_repo::{KeyValueStore, RepoResult};

/// Key holding the JSON-encoded survey array.
pub const SURVEYS_KEY: &str = "surveys";

/// Persistence contract for the full survey list.
pub trait SurveyRepository {
    /// Returns `None` when nothing was ever persisted.
    fn load_surveys(&self) -> RepoResult<Option<Vec<SurveyRecord>>>;
    /// Overwrites the persisted list with `surveys`.
    fn save_surveys(&self, surveys: &[SurveyRecord]) -> RepoResult<()>;
}

/// JSON-in-a-slot survey repository.
pub struct KvSurveyRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvSurveyRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> SurveyRepository for KvSurveyRepository<S> {
    fn load_surveys(&self) -> RepoResult<Option<Vec<SurveyRecord>>> {
        match self.store.get_item(SURVEYS_KEY)? {
            Some(raw) => Ok(Some(decode_surveys(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_surveys(&self, surveys: &[SurveyRecord]) -> RepoResult<()> {
        let encoded = serde_json::to_string(surveys)?;
        self.store.set_item(SURVEYS_KEY, &encoded)
    }
}

/// Decodes a persisted survey array.
pub fn decode_surveys(raw: &str) -> RepoResult<Vec<SurveyRecord>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::{decode_surveys, KvSurveyRepository, SurveyRepository, SURVEYS_KEY};
    use crate::db::open_db_in_memory;
    use crate::model::survey::SurveyRecord;
    use crate::repo::kv_repo::{KeyValueStore, RepoError, SqliteKvStore};

    #[test]
    fn absent_slot_loads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let repo = KvSurveyRepository::new(SqliteKvStore::try_new(&conn).unwrap());
        assert!(repo.load_surveys().unwrap().is_none());
    }

    #[test]
    fn empty_list_is_distinct_from_absent() {
        let conn = open_db_in_memory().unwrap();
        let repo = KvSurveyRepository::new(SqliteKvStore::try_new(&conn).unwrap());
        repo.save_surveys(&[]).unwrap();
        assert_eq!(repo.load_surveys().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn truncated_payload_is_reported() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        store.set_item(SURVEYS_KEY, "[{\"address\":\"Ca").unwrap();

        let repo = KvSurveyRepository::new(&store);
        let err = repo.load_surveys().unwrap_err();
        assert!(matches!(err, RepoError::Payload(_)));
    }

    #[test]
    fn decode_keeps_array_order() {
        let raw = r#"[{"address":"a","date":"1"},{"address":"b","date":"2"}]"#;
        let decoded: Vec<SurveyRecord> = decode_surveys(raw).unwrap();
        let addresses: Vec<_> = decoded.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, ["a", "b"]);
    }
}
