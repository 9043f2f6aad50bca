//! Survey record domain model.
//!
//! # Responsibility
//! - Define the canonical record captured by one save action.
//! - Keep the persisted JSON shape compatible with existing device payloads.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused for another record.
//! - Tally fields are unbounded signed counters.
//! - `date` is a display string stamped at save time, not a sortable key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a survey record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type SurveyId = Uuid;

/// One respondent's answers and tallies captured in a single save action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Payloads written before ids existed get a fresh one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: SurveyId,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub si: i64,
    #[serde(default)]
    pub no: i64,
    #[serde(default)]
    pub ct: i64,
    #[serde(default)]
    pub interest: i64,
    /// Free-text notes. May contain the export delimiter and line breaks.
    #[serde(default, rename = "additionalInfo")]
    pub additional_info: String,
    /// Human-readable timestamp captured when the record was saved.
    #[serde(default)]
    pub date: String,
}

impl SurveyRecord {
    /// Creates an empty record with a generated stable ID.
    pub fn new(date: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date)
    }

    /// Creates an empty record with a caller-provided ID.
    ///
    /// Used when an edit replaces an existing record in place.
    pub fn with_id(id: SurveyId, date: impl Into<String>) -> Self {
        Self {
            id,
            address: String::new(),
            si: 0,
            no: 0,
            ct: 0,
            interest: 0,
            additional_info: String::new(),
            date: date.into(),
        }
    }

    /// Reads one tally counter.
    pub fn tally(&self, field: TallyField) -> i64 {
        match field {
            TallyField::Si => self.si,
            TallyField::No => self.no,
            TallyField::Ct => self.ct,
            TallyField::Interest => self.interest,
        }
    }

    /// Short row label shown in the saved-surveys list.
    pub fn list_label(&self) -> String {
        format!("{} - {}", self.date, self.address)
    }
}

/// Counter fields adjusted by fixed +1/-1 steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TallyField {
    Si,
    No,
    Ct,
    Interest,
}

impl TallyField {
    /// All tally fields in on-screen order.
    pub const ALL: [TallyField; 4] = [Self::Si, Self::No, Self::Ct, Self::Interest];

    /// On-screen card label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Si => "SI",
            Self::No => "NO",
            Self::Ct => "CT",
            Self::Interest => "Interés",
        }
    }

    /// Parses a label or a lowercase key (`si|no|ct|interest`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "si" => Some(Self::Si),
            "no" => Some(Self::No),
            "ct" => Some(Self::Ct),
            "interest" | "interés" | "interes" => Some(Self::Interest),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SurveyRecord, TallyField};

    #[test]
    fn legacy_payload_without_id_gets_generated_id() {
        let json = r#"{"address":"Calle 1","si":2,"no":0,"ct":1,"interest":3,"additionalInfo":"ok","date":"1/2/2024, 10:00:00"}"#;
        let record: SurveyRecord = serde_json::from_str(json).expect("legacy payload parses");
        assert_eq!(record.address, "Calle 1");
        assert_eq!(record.si, 2);
        assert_eq!(record.additional_info, "ok");
        assert!(!record.id.is_nil());
    }

    #[test]
    fn serialized_shape_uses_device_payload_keys() {
        let mut record = SurveyRecord::new("now");
        record.additional_info = "nota".to_string();
        let value = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(value["additionalInfo"], "nota");
        assert!(value.get("additional_info").is_none());
        assert_eq!(value["date"], "now");
    }

    #[test]
    fn tally_field_parse_accepts_labels_and_keys() {
        assert_eq!(TallyField::parse("SI"), Some(TallyField::Si));
        assert_eq!(TallyField::parse("Interés"), Some(TallyField::Interest));
        assert_eq!(TallyField::parse(" ct "), Some(TallyField::Ct));
        assert_eq!(TallyField::parse("maybe"), None);
    }
}
