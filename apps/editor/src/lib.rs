//! Structured resume editing: a typed document rendered to an editable,
//! reorderable surface and reconciled back on save, plus the flattened-line
//! export contract and a thin HTTP adapter.

pub mod config;
pub mod editor;
pub mod errors;
pub mod export;
pub mod models;
pub mod routes;
pub mod state;
pub mod surface;
