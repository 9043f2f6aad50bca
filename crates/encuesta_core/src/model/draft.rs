//! Form draft state.
//!
//! # Responsibility
//! - Hold the not-yet-saved fields of the record being entered or edited.
//! - Distinguish create mode from edit mode by the edit target.
//!
//! # Invariants
//! - `editing == None` means create mode; `Some(id)` means edit mode.
//! - Tally steps are exactly +1/-1 with no floor or ceiling.

use crate::model::survey::{SurveyId, SurveyRecord, TallyField};

const SAVE_LABEL: &str = "Guardar Encuesta";
const UPDATE_LABEL: &str = "Actualizar Encuesta";

/// Whole-form mode derived from the edit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(SurveyId),
}

/// In-progress form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyDraft {
    pub address: String,
    pub si: i64,
    pub no: i64,
    pub ct: i64,
    pub interest: i64,
    pub additional_info: String,
    editing: Option<SurveyId>,
}

impl SurveyDraft {
    /// Creates a blank draft in create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the target record into the draft and switches to edit mode.
    pub fn enter_edit_mode(&mut self, record: &SurveyRecord) {
        self.address = record.address.clone();
        self.si = record.si;
        self.no = record.no;
        self.ct = record.ct;
        self.interest = record.interest;
        self.additional_info = record.additional_info.clone();
        self.editing = Some(record.id);
    }

    /// Resets every field to its default and returns to create mode.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns to create mode without touching the field values.
    pub fn clear_edit_target(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<SurveyId> {
        self.editing
    }

    pub fn mode(&self) -> FormMode {
        match self.editing {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    /// Label of the primary save button for the current mode.
    pub fn save_label(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => SAVE_LABEL,
            FormMode::Edit(_) => UPDATE_LABEL,
        }
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = value.into();
    }

    pub fn set_additional_info(&mut self, value: impl Into<String>) {
        self.additional_info = value.into();
    }

    pub fn tally(&self, field: TallyField) -> i64 {
        match field {
            TallyField::Si => self.si,
            TallyField::No => self.no,
            TallyField::Ct => self.ct,
            TallyField::Interest => self.interest,
        }
    }

    pub fn increment(&mut self, field: TallyField) {
        let slot = self.tally_mut(field);
        *slot = slot.saturating_add(1);
    }

    pub fn decrement(&mut self, field: TallyField) {
        let slot = self.tally_mut(field);
        *slot = slot.saturating_sub(1);
    }

    /// Builds the record to store, stamped with the save-time `date`.
    ///
    /// In edit mode the record keeps the edited record's ID.
    pub fn to_record(&self, date: impl Into<String>) -> SurveyRecord {
        let mut record = match self.editing {
            Some(id) => SurveyRecord::with_id(id, date),
            None => SurveyRecord::new(date),
        };
        record.address = self.address.clone();
        record.si = self.si;
        record.no = self.no;
        record.ct = self.ct;
        record.interest = self.interest;
        record.additional_info = self.additional_info.clone();
        record
    }

    fn tally_mut(&mut self, field: TallyField) -> &mut i64 {
        match field {
            TallyField::Si => &mut self.si,
            TallyField::No => &mut self.no,
            TallyField::Ct => &mut self.ct,
            TallyField::Interest => &mut self.interest,
        }
    }
}
