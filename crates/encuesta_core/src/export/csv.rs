//! CSV rendering, file write and share hand-off.
//!
//! # Invariants
//! - The document is one header line plus one line per record, list order.
//! - Commas inside notes become single spaces.
//! - Any field still containing `,`, `"`, `\r` or `\n` is RFC 4180 quoted,
//!   so every record stays on one logical row.
//! - The export file is overwritten on every export.

use crate::model::survey::SurveyRecord;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CSV_DELIMITER: char = ',';
pub const CSV_HEADER: &str = "Fecha,Dirección,SI,NO,CT,Interés,Información adicional";

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    /// Writing the export file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The share target rejected or failed the hand-off.
    Share(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
            Self::Share(message) => write!(f, "share failed: {message}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Share(_) => None,
        }
    }
}

/// Platform share/open mechanism receiving the written file.
///
/// User cancellation is not reported back.
pub trait ShareTarget {
    fn share(&mut self, path: &Path) -> ExportResult<()>;
}

/// Renders the full CSV document.
pub fn render_csv(surveys: &[SurveyRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + surveys.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for survey in surveys {
        out.push_str(&render_row(survey));
        out.push('\n');
    }
    out
}

/// Renders one record row without the trailing newline.
pub fn render_row(survey: &SurveyRecord) -> String {
    let notes = survey.additional_info.replace(CSV_DELIMITER, " ");
    let fields = [
        escape_field(&survey.date),
        escape_field(&survey.address),
        survey.si.to_string(),
        survey.no.to_string(),
        survey.ct.to_string(),
        survey.interest.to_string(),
        escape_field(&notes),
    ];
    fields.join(",")
}

/// Quotes a field when it would otherwise break the row structure.
pub fn escape_field(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c == CSV_DELIMITER || c == '"' || c == '\n' || c == '\r');
    if !needs_quotes {
        return value.to_string();
    }
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Writes the export file and shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    export_dir: PathBuf,
    file_name: String,
}

impl CsvExporter {
    pub fn new(export_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            export_dir: export_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.export_dir.join(&self.file_name)
    }

    /// Writes the rendered document as UTF-8, replacing any previous export.
    pub fn write(&self, surveys: &[SurveyRecord]) -> ExportResult<PathBuf> {
        let path = self.file_path();
        let document = render_csv(surveys);
        std::fs::create_dir_all(&self.export_dir)
            .and_then(|()| std::fs::write(&path, document.as_bytes()))
            .map_err(|source| {
                error!(
                    "event=export_write module=export status=error error_code=write_failed error={}",
                    source
                );
                ExportError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
        info!(
            "event=export_write module=export status=ok rows={} bytes={}",
            surveys.len(),
            document.len()
        );
        Ok(path)
    }

    /// Writes then shares the export file. Returns the written path.
    pub fn export_and_share(
        &self,
        surveys: &[SurveyRecord],
        target: &mut dyn ShareTarget,
    ) -> ExportResult<PathBuf> {
        let path = self.write(surveys)?;
        target.share(&path)?;
        info!("event=export_share module=export status=ok");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, render_csv, render_row, CSV_HEADER};
    use crate::model::survey::SurveyRecord;

    fn record(address: &str, notes: &str) -> SurveyRecord {
        let mut record = SurveyRecord::new("09/03/2024, 14:05:07");
        record.address = address.to_string();
        record.additional_info = notes.to_string();
        record
    }

    #[test]
    fn empty_list_renders_header_only() {
        assert_eq!(render_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn commas_in_notes_become_spaces() {
        let mut survey = record("Calle 1", "a,b");
        survey.si = 2;
        survey.ct = 1;
        survey.interest = -1;
        assert_eq!(
            render_row(&survey),
            "\"09/03/2024, 14:05:07\",Calle 1,2,0,1,-1,a b"
        );
    }

    #[test]
    fn address_with_comma_and_notes_with_newline_are_quoted() {
        let row = render_row(&record("Calle 1, 2ºB", "línea 1\nlínea \"2\""));
        assert!(row.contains("\"Calle 1, 2ºB\""));
        assert!(row.ends_with("\"línea 1\nlínea \"\"2\"\"\""));
    }

    #[test]
    fn plain_fields_are_left_untouched() {
        assert_eq!(escape_field("Calle Mayor 3"), "Calle Mayor 3");
        assert_eq!(escape_field(""), "");
    }
}
