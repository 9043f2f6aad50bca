//! User-facing confirmations and notices.
//!
//! The UI owns rendering; core only decides when each one happens.

use crate::model::survey::SurveyRecord;

pub const DELETE_PROMPT_TITLE: &str = "Confirmación";
pub const DELETE_PROMPT_MESSAGE: &str = "¿Estás seguro de que deseas eliminar esta encuesta?";
pub const DELETE_CANCEL_LABEL: &str = "Cancelar";
pub const DELETE_CONFIRM_LABEL: &str = "Eliminar";

/// Answer to the two-choice delete prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Cancel,
    Confirm,
}

/// Blocking two-button prompt shown before a delete.
pub trait DeletePrompt {
    fn confirm_delete(&mut self, record: &SurveyRecord) -> Confirmation;
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub Confirmation);

impl DeletePrompt for FixedAnswer {
    fn confirm_delete(&mut self, _record: &SurveyRecord) -> Confirmation {
        self.0
    }
}

/// Dismissable notice shown after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Deleted,
}

impl Notice {
    pub fn title(self) -> &'static str {
        match self {
            Self::Saved => "Guardado",
            Self::Deleted => "Eliminado",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Saved => "Encuesta guardada exitosamente",
            Self::Deleted => "Encuesta eliminada exitosamente",
        }
    }
}
