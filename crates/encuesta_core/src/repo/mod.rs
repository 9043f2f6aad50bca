//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Model the device key-value storage as a trait with a SQLite backend.
//! - Persist the survey list as one JSON payload in a single slot.
//!
//! # Invariants
//! - Repository APIs return transport errors (`Db`) separately from payload
//!   decoding errors (`Payload`).

pub mod kv_repo;
pub mod survey_repo;
