//! The editing core: render a document to a surface, edit and reorder the
//! surface live, and reconcile it back into a document on save.

pub mod bridge;
pub mod reconcile;
pub mod render;
pub mod reorder;
pub mod session;
pub mod structure;

pub use bridge::{surface_node_to_inline, Key, KeyPress};
pub use reconcile::reconcile;
pub use render::render;
pub use session::{EditMode, EditSession, EventOutcome, SurfaceEvent};
