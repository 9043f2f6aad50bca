//! Survey domain model.
//!
//! # Responsibility
//! - Define the persisted survey record and the in-progress form draft.
//!
//! # Invariants
//! - Every record is identified by a stable `SurveyId`.
//! - Deletion is a hard removal from the ordered list.

pub mod draft;
pub mod survey;
