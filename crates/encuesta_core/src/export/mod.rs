//! Delimited export of the survey list.
//!
//! # Responsibility
//! - Render the survey list as a spreadsheet-friendly CSV document.
//! - Write it to a fixed file name and hand it to a share target.

pub mod csv;
