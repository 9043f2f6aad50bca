//! CLI command definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use encuesta_core::config::{DATA_DIR_ENV, LOG_LEVEL_ENV};
use encuesta_core::db::open_db;
use encuesta_core::service::prompt::{
    DELETE_CANCEL_LABEL, DELETE_CONFIRM_LABEL, DELETE_PROMPT_MESSAGE, DELETE_PROMPT_TITLE,
};
use encuesta_core::{
    AppConfig, ClockTicker, Confirmation, CsvExporter, DeleteOutcome, DeletePrompt, ExportError,
    KvSurveyRepository, Notice, ShareTarget, SqliteKvStore, SurveyRecord, SurveyService,
    SurveyTarget, SystemClock, TallyField,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "encuesta")]
#[command(author, version, about = "Record door-to-door survey results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the survey database and exports
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn config(&self) -> AppConfig {
        AppConfig::resolve(self.data_dir.clone(), self.log_level.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved surveys
    List,

    /// Save a new survey
    Add {
        #[command(flatten)]
        fields: SurveyFields,
    },

    /// Edit a saved survey (1-based row from `list`)
    Edit {
        row: usize,

        #[command(flatten)]
        fields: SurveyFields,
    },

    /// Delete a saved survey (1-based row from `list`)
    Delete {
        row: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export all surveys to encuestas.csv
    Export {
        /// Write the file here instead of the data directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show the ticking clock
    Clock {
        /// Number of ticks before exiting
        #[arg(long, default_value_t = 5)]
        ticks: u32,
    },

    /// Check core linkage
    Ping,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct SurveyFields {
    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Additional information
    #[arg(long)]
    pub notes: Option<String>,

    /// Tally to step up by one (si|no|ct|interest), repeatable
    #[arg(long = "inc", value_parser = parse_tally)]
    pub increments: Vec<TallyField>,

    /// Tally to step down by one (si|no|ct|interest), repeatable
    #[arg(long = "dec", value_parser = parse_tally)]
    pub decrements: Vec<TallyField>,
}

fn parse_tally(value: &str) -> Result<TallyField, String> {
    TallyField::parse(value)
        .ok_or_else(|| format!("unknown tally `{value}`; expected si|no|ct|interest"))
}

/// Interactive two-button delete confirmation.
struct TerminalPrompt;

impl DeletePrompt for TerminalPrompt {
    fn confirm_delete(&mut self, record: &SurveyRecord) -> Confirmation {
        let prompt = format!(
            "{DELETE_PROMPT_TITLE}: {DELETE_PROMPT_MESSAGE} ({})",
            record.list_label()
        );
        let choice = dialoguer::Select::new()
            .with_prompt(prompt)
            .items(&[DELETE_CANCEL_LABEL, DELETE_CONFIRM_LABEL])
            .default(0)
            .interact();
        match choice {
            Ok(1) => Confirmation::Confirm,
            _ => Confirmation::Cancel,
        }
    }
}

/// `--yes` answers the prompt up front.
struct AssumeYes;

impl DeletePrompt for AssumeYes {
    fn confirm_delete(&mut self, _record: &SurveyRecord) -> Confirmation {
        Confirmation::Confirm
    }
}

/// Terminal stand-in for the share sheet: reports where the file is.
struct PrintShare<'a> {
    out: &'a mut dyn Write,
}

impl ShareTarget for PrintShare<'_> {
    fn share(&mut self, path: &Path) -> Result<(), ExportError> {
        writeln!(self.out, "Shared: {}", path.display())
            .map_err(|err| ExportError::Share(err.to_string()))
    }
}

/// Runs one command against the configured storage.
pub fn run(command: Commands, config: &AppConfig, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::List => list_surveys(config, out),
        Commands::Add { fields } => add_survey(config, &fields, out),
        Commands::Edit { row, fields } => edit_survey(config, row, &fields, out),
        Commands::Delete { row, yes } => {
            if yes {
                delete_survey(config, row, &mut AssumeYes, out)
            } else {
                delete_survey(config, row, &mut TerminalPrompt, out)
            }
        }
        Commands::Export { dir } => export_surveys(config, dir, out),
        Commands::Clock { ticks } => show_clock(ticks, out),
        Commands::Ping => {
            writeln!(out, "encuesta_core ping={}", encuesta_core::ping())?;
            writeln!(out, "encuesta_core version={}", encuesta_core::core_version())?;
            Ok(())
        }
    }
}

type CliService<'conn> = SurveyService<KvSurveyRepository<SqliteKvStore<'conn>>, SystemClock>;

fn with_service<T>(
    config: &AppConfig,
    f: impl FnOnce(&mut CliService<'_>) -> Result<T>,
) -> Result<T> {
    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open survey database `{}`", db_path.display()))?;
    let store = SqliteKvStore::try_new(&conn).context("survey store not ready")?;
    let mut service = SurveyService::new(KvSurveyRepository::new(store), SystemClock);
    service.load_all();
    if let Some(failure) = service.status().last_failure() {
        bail!("stored surveys unreadable: {failure}");
    }
    f(&mut service)
}

fn list_surveys(config: &AppConfig, out: &mut dyn Write) -> Result<()> {
    with_service(config, |service| {
        writeln!(out, "Encuestas Guardadas:")?;
        if service.surveys().is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (index, record) in service.surveys().iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {}  [SI {} | NO {} | CT {} | Interés {}]",
                index + 1,
                record.list_label(),
                record.si,
                record.no,
                record.ct,
                record.interest
            )?;
        }
        Ok(())
    })
}

fn add_survey(config: &AppConfig, fields: &SurveyFields, out: &mut dyn Write) -> Result<()> {
    with_service(config, |service| {
        apply_fields(service, fields);
        let notice = service.save_draft()?;
        report_notice(service, notice, out)
    })
}

fn edit_survey(
    config: &AppConfig,
    row: usize,
    fields: &SurveyFields,
    out: &mut dyn Write,
) -> Result<()> {
    let index = row_to_index(row)?;
    with_service(config, |service| {
        service.enter_edit_mode(index)?;
        apply_fields(service, fields);
        let notice = service.save_draft()?;
        report_notice(service, notice, out)
    })
}

fn delete_survey(
    config: &AppConfig,
    row: usize,
    prompt: &mut dyn DeletePrompt,
    out: &mut dyn Write,
) -> Result<()> {
    let index = row_to_index(row)?;
    with_service(config, |service| {
        match service.delete(SurveyTarget::Index(index), prompt)? {
            DeleteOutcome::Cancelled => {
                writeln!(out, "Cancelled.")?;
                Ok(())
            }
            DeleteOutcome::Deleted { notice } => report_notice(service, notice, out),
        }
    })
}

fn export_surveys(config: &AppConfig, dir: Option<PathBuf>, out: &mut dyn Write) -> Result<()> {
    let exporter = CsvExporter::new(
        dir.unwrap_or_else(|| config.export_dir()),
        config.export_file_name.clone(),
    );
    with_service(config, |service| {
        let mut share = PrintShare { out: &mut *out };
        if service.export(&exporter, &mut share).is_none() {
            if let Some(failure) = service.status().last_failure() {
                bail!("{failure}");
            }
        }
        Ok(())
    })
}

fn show_clock(ticks: u32, out: &mut dyn Write) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut ticker = ClockTicker::start(SystemClock, move |value| {
        let _ = tx.send(value);
    })
    .context("failed to start clock")?;
    for _ in 0..ticks {
        let value = rx
            .recv_timeout(Duration::from_secs(2))
            .context("clock stopped ticking")?;
        writeln!(out, "{value}")?;
        out.flush()?;
    }
    ticker.stop();
    Ok(())
}

fn apply_fields(service: &mut CliService<'_>, fields: &SurveyFields) {
    let draft = service.draft_mut();
    if let Some(address) = &fields.address {
        draft.set_address(address.clone());
    }
    if let Some(notes) = &fields.notes {
        draft.set_additional_info(notes.clone());
    }
    for field in &fields.increments {
        draft.increment(*field);
    }
    for field in &fields.decrements {
        draft.decrement(*field);
    }
}

fn report_notice(
    service: &CliService<'_>,
    notice: Option<Notice>,
    out: &mut dyn Write,
) -> Result<()> {
    match notice {
        Some(notice) => {
            writeln!(out, "{}: {}", notice.title(), notice.message())?;
            Ok(())
        }
        None => match service.status().last_failure() {
            Some(failure) => bail!("{failure}"),
            None => bail!("write not confirmed"),
        },
    }
}

fn row_to_index(row: usize) -> Result<usize> {
    match row.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("rows are numbered from 1"),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Commands, SurveyFields};
    use clap::Parser;
    use encuesta_core::{AppConfig, TallyField};

    fn config_in(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig::resolve(Some(dir.path().to_path_buf()), Some("warn".to_string()))
    }

    fn run_to_string(command: Commands, config: &AppConfig) -> String {
        let mut out = Vec::new();
        run(command, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_repeatable_tally_steps() {
        let cli = Cli::try_parse_from([
            "encuesta", "add", "--address", "Calle 1", "--inc", "si", "--inc", "SI", "--dec",
            "interest",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { fields } => {
                assert_eq!(fields.address.as_deref(), Some("Calle 1"));
                assert_eq!(fields.increments, [TallyField::Si, TallyField::Si]);
                assert_eq!(fields.decrements, [TallyField::Interest]);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn rejects_unknown_tally() {
        assert!(Cli::try_parse_from(["encuesta", "add", "--inc", "maybe"]).is_err());
    }

    #[test]
    fn add_edit_delete_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let saved = run_to_string(
            Commands::Add {
                fields: SurveyFields {
                    address: Some("Calle 1".to_string()),
                    increments: vec![TallyField::Si, TallyField::Si],
                    ..SurveyFields::default()
                },
            },
            &config,
        );
        assert!(saved.contains("Encuesta guardada exitosamente"));

        run_to_string(
            Commands::Edit {
                row: 1,
                fields: SurveyFields {
                    increments: vec![TallyField::Si],
                    ..SurveyFields::default()
                },
            },
            &config,
        );
        let listed = run_to_string(Commands::List, &config);
        assert!(listed.contains("Calle 1"));
        assert!(listed.contains("SI 3"));

        let deleted = run_to_string(Commands::Delete { row: 1, yes: true }, &config);
        assert!(deleted.contains("Encuesta eliminada exitosamente"));
        assert!(run_to_string(Commands::List, &config).contains("(none)"));
    }

    #[test]
    fn row_zero_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut out = Vec::new();
        assert!(run(Commands::Delete { row: 0, yes: true }, &config, &mut out).is_err());
    }

    #[test]
    fn export_reports_shared_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let output = run_to_string(Commands::Export { dir: None }, &config);

        let expected = dir.path().join("encuestas.csv");
        assert!(output.contains(&expected.display().to_string()));
        assert!(expected.exists());
    }
}
