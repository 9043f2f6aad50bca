//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate draft, store and repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod prompt;
pub mod status;
pub mod survey_service;
pub mod survey_store;
