//! Flutter-facing bindings for encuesta core.

pub mod api;
