//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level survey functions to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message, no throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection and restores the list first.
//! - Every survey call is refused when the stored list could not be restored:
//!   an unreadable slot is neither listed as empty, exported, nor overwritten.
//! - Delete confirmation and the share sheet live on the Dart side.

use encuesta_core::db::open_db;
use encuesta_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, Clock, Confirmation, CsvExporter, DeleteOutcome, ExportError, FixedAnswer,
    KvSurveyRepository, Notice, PersistenceOp, ShareTarget, SqliteKvStore, SurveyId,
    SurveyRecord, SurveyService, SurveyTarget, SystemClock,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

type FfiService<'conn> = SurveyService<KvSurveyRepository<SqliteKvStore<'conn>>, SystemClock>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Points storage and export at the app documents directory.
///
/// Must run before the first survey call; later calls with the same
/// directory are accepted, a different directory is rejected.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_data_dir(data_dir: String) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = APP_CONFIG.get_or_init(|| AppConfig::resolve(Some(requested.clone()), None));
    if active.data_dir == requested {
        String::new()
    } else {
        format!(
            "data dir already configured at `{}`; refusing to switch to `{}`",
            active.data_dir.display(),
            requested.display()
        )
    }
}

/// Current on-screen clock value.
#[flutter_rust_bridge::frb(sync)]
pub fn clock_now() -> String {
    SystemClock.now_display()
}

/// One row of the saved-surveys list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyItem {
    /// Stable survey ID in string form.
    pub survey_id: String,
    pub address: String,
    pub si: i64,
    pub no: i64,
    pub ct: i64,
    pub interest: i64,
    pub additional_info: String,
    /// Save-time display timestamp.
    pub date: String,
}

/// Draft fields submitted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyInput {
    pub address: String,
    pub si: i64,
    pub no: i64,
    pub ct: i64,
    pub interest: i64,
    pub additional_info: String,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyListResponse {
    pub ok: bool,
    /// Records in list order.
    pub items: Vec<SurveyItem>,
    pub message: String,
}

/// Generic action response envelope for save/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyActionResponse {
    /// Whether the change reached durable storage.
    pub ok: bool,
    /// Saved survey ID for saves.
    pub survey_id: Option<String>,
    /// Notice to show, when one applies.
    pub notice_title: Option<String>,
    pub message: String,
}

impl SurveyActionResponse {
    fn from_notice(notice: Notice, survey_id: Option<String>) -> Self {
        Self {
            ok: true,
            survey_id,
            notice_title: Some(notice.title().to_string()),
            message: notice.message().to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            survey_id: None,
            notice_title: None,
            message: message.into(),
        }
    }
}

/// Export response envelope. Dart opens the share sheet on `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyExportResponse {
    pub ok: bool,
    pub path: Option<String>,
    pub message: String,
}

/// Lists saved surveys in list order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns `ok=false` when the stored list cannot be restored, so an
///   unreadable slot is never shown as an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn surveys_list() -> SurveyListResponse {
    let result = with_survey_service(|service| {
        ensure_restored(service)?;
        Ok(service.surveys().iter().map(to_survey_item).collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = format!("{} survey(s).", items.len());
            SurveyListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => SurveyListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

/// Saves a survey: appends when `editing_id` is `None`, otherwise replaces
/// the record with that ID in place.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Stamps the record with the current clock value.
/// - Returns `ok=false` when the ID is unknown or the write failed.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_save(input: SurveyInput, editing_id: Option<String>) -> SurveyActionResponse {
    let target = match editing_id.as_deref().map(parse_survey_id).transpose() {
        Ok(target) => target,
        Err(message) => return SurveyActionResponse::failure(message),
    };

    let result = with_survey_service(|service| {
        ensure_restored(service)?;
        if let Some(id) = target {
            service
                .enter_edit_mode(id)
                .map_err(|err| format!("survey_save failed: {err}"))?;
        }
        apply_input(service, input);
        let saved_id = service.draft().editing().map(|id| id.to_string());
        let notice = service
            .save_draft()
            .map_err(|err| format!("survey_save failed: {err}"))?;
        let saved_id = saved_id.or_else(|| service.surveys().last().map(|r| r.id.to_string()));
        Ok((notice, saved_id, write_failure(service)))
    });

    match result {
        Ok((Some(notice), saved_id, _)) => SurveyActionResponse::from_notice(notice, saved_id),
        Ok((None, _, failure)) => SurveyActionResponse::failure(format!(
            "survey_save failed: {}",
            failure.unwrap_or_else(|| "write not confirmed".to_string())
        )),
        Err(message) => SurveyActionResponse::failure(message),
    }
}

/// Deletes a survey the user already confirmed in the Dart dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn survey_delete(survey_id: String) -> SurveyActionResponse {
    let id = match parse_survey_id(survey_id.as_str()) {
        Ok(id) => id,
        Err(message) => return SurveyActionResponse::failure(message),
    };

    let result = with_survey_service(|service| {
        ensure_restored(service)?;
        let outcome = service
            .delete(SurveyTarget::Id(id), &mut FixedAnswer(Confirmation::Confirm))
            .map_err(|err| format!("survey_delete failed: {err}"))?;
        Ok((outcome, write_failure(service)))
    });

    match result {
        Ok((DeleteOutcome::Deleted { notice: Some(notice) }, _)) => {
            SurveyActionResponse::from_notice(notice, Some(survey_id))
        }
        Ok((DeleteOutcome::Deleted { notice: None }, failure)) => {
            SurveyActionResponse::failure(format!(
                "survey_delete failed: {}",
                failure.unwrap_or_else(|| "write not confirmed".to_string())
            ))
        }
        Ok((DeleteOutcome::Cancelled, _)) => SurveyActionResponse::failure("delete cancelled"),
        Err(message) => SurveyActionResponse::failure(message),
    }
}

/// Writes `encuestas.csv` and returns its path for the share sheet.
///
/// `export_dir` overrides the configured data directory when set. Refused
/// when the stored list cannot be restored, leaving any previous export.
#[flutter_rust_bridge::frb(sync)]
pub fn surveys_export(export_dir: Option<String>) -> SurveyExportResponse {
    let config = resolve_config();
    let dir = export_dir
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export_dir());
    let exporter = CsvExporter::new(dir, config.export_file_name.clone());

    let result = with_survey_service(|service| {
        ensure_restored(service)?;
        let mut handoff = DartShareHandoff;
        let path = service.export(&exporter, &mut handoff);
        let failure = service
            .status()
            .last_failure()
            .filter(|failure| failure.op == PersistenceOp::Export)
            .map(|failure| failure.to_string());
        Ok((path, failure))
    });

    match result {
        Ok((Some(path), _)) => SurveyExportResponse {
            ok: true,
            path: Some(path.display().to_string()),
            message: "Export written.".to_string(),
        },
        Ok((None, failure)) => SurveyExportResponse {
            ok: false,
            path: None,
            message: format!(
                "surveys_export failed: {}",
                failure.unwrap_or_else(|| "unknown".to_string())
            ),
        },
        Err(message) => SurveyExportResponse {
            ok: false,
            path: None,
            message,
        },
    }
}

/// The share sheet is opened by Dart with the returned path.
struct DartShareHandoff;

impl ShareTarget for DartShareHandoff {
    fn share(&mut self, _path: &Path) -> Result<(), ExportError> {
        Ok(())
    }
}

fn resolve_config() -> AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env).clone()
}

fn with_survey_service<T>(
    f: impl FnOnce(&mut FfiService<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config();
    let conn = open_db(config.db_path()).map_err(|err| format!("survey DB open failed: {err}"))?;
    let store =
        SqliteKvStore::try_new(&conn).map_err(|err| format!("survey store init failed: {err}"))?;
    let mut service = SurveyService::new(KvSurveyRepository::new(store), SystemClock);
    service.load_all();
    f(&mut service)
}

fn ensure_restored(service: &FfiService<'_>) -> Result<(), String> {
    match service.status().last_failure() {
        Some(failure) if failure.op == PersistenceOp::Load => {
            warn!("event=ffi_restore_check module=ffi status=refused error_code=load_failed");
            Err(format!("stored surveys unreadable: {failure}"))
        }
        _ => Ok(()),
    }
}

fn write_failure(service: &FfiService<'_>) -> Option<String> {
    service
        .status()
        .last_failure()
        .filter(|failure| failure.op == PersistenceOp::Save)
        .map(|failure| failure.to_string())
}

fn apply_input(service: &mut FfiService<'_>, input: SurveyInput) {
    let draft = service.draft_mut();
    draft.set_address(input.address);
    draft.si = input.si;
    draft.no = input.no;
    draft.ct = input.ct;
    draft.interest = input.interest;
    draft.set_additional_info(input.additional_info);
}

fn parse_survey_id(raw: &str) -> Result<SurveyId, String> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid survey id `{raw}`"))
}

fn to_survey_item(record: &SurveyRecord) -> SurveyItem {
    SurveyItem {
        survey_id: record.id.to_string(),
        address: record.address.clone(),
        si: record.si,
        no: record.no,
        ct: record.ct,
        interest: record.interest,
        additional_info: record.additional_info.clone(),
        date: record.date.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, survey_delete, survey_save, surveys_export,
        surveys_list, SurveyInput,
    };
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Calls share one database file; each call is load-modify-write.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_edit_and_delete_round_trip() {
        let _guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let address = unique_token("calle");

        let created = survey_save(
            SurveyInput {
                address: address.clone(),
                si: 2,
                ..SurveyInput::default()
            },
            None,
        );
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.notice_title.as_deref(), Some("Guardado"));
        let survey_id = created.survey_id.expect("save should return survey_id");

        let updated = survey_save(
            SurveyInput {
                address: address.clone(),
                si: 3,
                ..SurveyInput::default()
            },
            Some(survey_id.clone()),
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.survey_id.as_deref(), Some(survey_id.as_str()));

        let listed = surveys_list();
        let matching: Vec<_> = listed
            .items
            .iter()
            .filter(|item| item.survey_id == survey_id)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].si, 3);

        let deleted = survey_delete(survey_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.notice_title.as_deref(), Some("Eliminado"));
        assert!(surveys_list()
            .items
            .iter()
            .all(|item| item.survey_id != survey_id));
    }

    #[test]
    fn save_with_unknown_id_fails_without_appending() {
        let _guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = surveys_list().items.len();

        let response = survey_save(
            SurveyInput::default(),
            Some("00000000-0000-4000-8000-000000000000".to_string()),
        );

        assert!(!response.ok);
        assert_eq!(surveys_list().items.len(), before);
    }

    #[test]
    fn delete_rejects_malformed_id() {
        let response = survey_delete("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid survey id"));
    }

    #[test]
    fn export_writes_csv_to_requested_dir() {
        let _guard = DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = std::env::temp_dir().join(unique_token("encuestas-export"));

        let response = surveys_export(Some(dir.display().to_string()));

        assert!(response.ok, "{}", response.message);
        let path = response.path.expect("export should return path");
        assert!(path.ends_with("encuestas.csv"));
        let contents = std::fs::read_to_string(&path).expect("read export");
        assert!(contents.starts_with("Fecha,Dirección,SI,NO,CT,Interés,Información adicional\n"));
        let _ = std::fs::remove_dir_all(dir);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
