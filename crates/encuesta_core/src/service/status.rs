//! Non-blocking persistence/export status indicator.
//!
//! # Invariants
//! - Failures never change survey state; they are only recorded here.
//! - A later success of the same operation clears its failure.

use std::fmt::{Display, Formatter};

/// Operation that touched storage or the export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Load,
    Save,
    Export,
}

impl PersistenceOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save => "save",
            Self::Export => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub op: PersistenceOp,
    pub message: String,
}

impl Display for PersistenceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.op.as_str(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceStatus {
    last_failure: Option<PersistenceFailure>,
}

impl PersistenceStatus {
    pub fn is_healthy(&self) -> bool {
        self.last_failure.is_none()
    }

    pub fn last_failure(&self) -> Option<&PersistenceFailure> {
        self.last_failure.as_ref()
    }

    pub fn record_failure(&mut self, op: PersistenceOp, message: impl Into<String>) {
        self.last_failure = Some(PersistenceFailure {
            op,
            message: message.into(),
        });
    }

    pub fn record_success(&mut self, op: PersistenceOp) {
        if self.last_failure.as_ref().is_some_and(|failure| failure.op == op) {
            self.last_failure = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistenceOp, PersistenceStatus};

    #[test]
    fn success_clears_only_matching_failure() {
        let mut status = PersistenceStatus::default();
        status.record_failure(PersistenceOp::Save, "disk full");
        status.record_success(PersistenceOp::Export);
        assert!(!status.is_healthy());

        status.record_success(PersistenceOp::Save);
        assert!(status.is_healthy());
    }
}
