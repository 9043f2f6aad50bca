//! The data dir is process-wide, so this binary holds a single scenario.

use encuesta_core::config::DEFAULT_DB_FILE_NAME;
use encuesta_core::db::open_db;
use encuesta_core::{KeyValueStore, SqliteKvStore, SURVEYS_KEY};
use encuesta_ffi::api::{
    configure_data_dir, survey_delete, survey_save, surveys_export, surveys_list, SurveyInput,
};
use std::path::Path;

const TRUNCATED_PAYLOAD: &str = r#"[{"address":"Ca"#;

fn stored_payload(data_dir: &Path) -> Option<String> {
    let conn = open_db(data_dir.join(DEFAULT_DB_FILE_NAME)).unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    store.get_item(SURVEYS_KEY).unwrap()
}

fn overwrite_payload(data_dir: &Path, payload: &str) {
    let conn = open_db(data_dir.join(DEFAULT_DB_FILE_NAME)).unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    store.set_item(SURVEYS_KEY, payload).unwrap();
}

#[test]
fn unreadable_slot_refuses_list_export_and_writes() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_path_buf();
    assert_eq!(configure_data_dir(data_dir.display().to_string()), "");

    let saved = survey_save(
        SurveyInput {
            address: "Calle 1".to_string(),
            si: 2,
            ..SurveyInput::default()
        },
        None,
    );
    assert!(saved.ok, "{}", saved.message);
    let saved_id = saved.survey_id.unwrap();
    assert_eq!(surveys_list().items.len(), 1);

    let exported = surveys_export(None);
    assert!(exported.ok, "{}", exported.message);
    let csv_path = exported.path.unwrap();
    let previous_csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(previous_csv.contains("Calle 1"));

    overwrite_payload(&data_dir, TRUNCATED_PAYLOAD);

    let listed = surveys_list();
    assert!(!listed.ok);
    assert!(listed.items.is_empty());
    assert!(listed.message.contains("unreadable"), "{}", listed.message);

    let exported = surveys_export(None);
    assert!(!exported.ok);
    assert_eq!(exported.path, None);
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), previous_csv);

    let saved = survey_save(
        SurveyInput {
            address: "Calle 2".to_string(),
            ..SurveyInput::default()
        },
        None,
    );
    assert!(!saved.ok);

    let deleted = survey_delete(saved_id);
    assert!(!deleted.ok);

    assert_eq!(stored_payload(&data_dir).as_deref(), Some(TRUNCATED_PAYLOAD));
}
