//! The export contract: what the Word/PDF renderers receive.

pub mod adapter;
pub mod lines;

pub use adapter::{export_filename, ExportFormat};
pub use lines::{flatten, to_markdown, ExportLine, LineKind};
