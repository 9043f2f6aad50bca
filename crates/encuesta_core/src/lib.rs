//! Core domain logic for the door-to-door survey form.
//! This crate is the single source of truth for survey state and persistence.

pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ClockTicker, FixedClock, SystemClock};
pub use config::AppConfig;
pub use export::csv::{render_csv, CsvExporter, ExportError, ShareTarget, CSV_HEADER};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::draft::{FormMode, SurveyDraft};
pub use model::survey::{SurveyId, SurveyRecord, TallyField};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::survey_repo::{KvSurveyRepository, SurveyRepository, SURVEYS_KEY};
pub use service::prompt::{Confirmation, DeletePrompt, FixedAnswer, Notice};
pub use service::status::{PersistenceFailure, PersistenceOp, PersistenceStatus};
pub use service::survey_service::{AppState, DeleteOutcome, SurveyService};
pub use service::survey_store::{StoreError, StoreResult, SurveyStore, SurveyTarget};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
