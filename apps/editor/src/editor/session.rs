//! The edit session: owner of the canonical document and of the surface
//! derived from it.
//!
//! ```text
//! Viewing --enter_edit--> Editing      (requires a document)
//! Editing --save-------> Viewing       (reconcile, replace, re-render)
//! Editing --cancel-----> Viewing       (re-render the untouched document)
//! ```
//!
//! The document only changes on load and on save. Every transition replaces
//! the surface wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::editor::bridge::{handle_key, KeyPress};
use crate::editor::reconcile::reconcile;
use crate::editor::render::render;
use crate::editor::reorder::{DragController, DropPosition};
use crate::editor::structure;
use crate::errors::EditorError;
use crate::export::lines::{flatten, ExportLine};
use crate::models::document::Document;
use crate::models::intake::parse_document;
use crate::surface::geometry::{FlowLayout, Geometry};
use crate::surface::{Action, NodeId, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Viewing => f.write_str("viewing"),
            EditMode::Editing => f.write_str("editing"),
        }
    }
}

/// An interaction reported by the host against surface nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Click { target: NodeId },
    Key { target: NodeId, press: KeyPress },
    DragStart { handle: NodeId },
    DragOver { target: NodeId, pointer_y: f32 },
    DragEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The event changed the surface or the session.
    pub handled: bool,
    /// The host must suppress its own default handling.
    pub prevent_default: bool,
}

impl EventOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }
}

pub struct EditSession {
    document: Option<Document>,
    mode: EditMode,
    surface: Surface,
    drag: DragController,
    geometry: Box<dyn Geometry>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::with_geometry(Box::new(FlowLayout::default()))
    }

    /// A session whose drag midpoints come from `geometry`.
    pub fn with_geometry(geometry: Box<dyn Geometry>) -> Self {
        Self {
            document: None,
            mode: EditMode::Viewing,
            surface: render(&Document::default(), EditMode::Viewing),
            drag: DragController::new(),
            geometry,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Direct access for host-side editing (typing, paste, Ctrl/Cmd+B).
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Replaces the document wholesale and shows it in view mode. Any edit in
    /// progress is discarded.
    pub fn load(&mut self, document: Document) {
        if self.mode == EditMode::Editing {
            info!("Document replaced while editing, discarding surface edits");
        }
        self.document = Some(document);
        self.show(EditMode::Viewing);
    }

    /// Validates and loads a document produced by the generation service.
    /// An invalid document leaves the session untouched.
    pub fn load_generated(&mut self, value: &Value) -> Result<(), EditorError> {
        let document = parse_document(value)?;
        self.load(document);
        Ok(())
    }

    pub fn enter_edit(&mut self) -> Result<(), EditorError> {
        if self.mode == EditMode::Editing {
            return Err(self.invalid("enter edit"));
        }
        if self.document.is_none() {
            return Err(EditorError::NoDocument);
        }
        self.show(EditMode::Editing);
        info!("Entered edit mode");
        Ok(())
    }

    /// Reads the surface back into a new document, replaces the current one
    /// and returns to view mode.
    pub fn save(&mut self) -> Result<(), EditorError> {
        if self.mode != EditMode::Editing {
            return Err(self.invalid("save"));
        }
        let previous = self.document.as_ref().ok_or(EditorError::NoDocument)?;
        let next = reconcile(&self.surface, previous);
        info!(sections = next.sections.len(), "Saved edits");
        self.document = Some(next);
        self.show(EditMode::Viewing);
        Ok(())
    }

    /// Discards surface edits and returns to view mode.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        if self.mode != EditMode::Editing {
            return Err(self.invalid("cancel"));
        }
        self.show(EditMode::Viewing);
        info!("Cancelled edits");
        Ok(())
    }

    fn show(&mut self, mode: EditMode) {
        self.mode = mode;
        self.drag = DragController::new();
        let empty = Document::default();
        self.surface = render(self.document.as_ref().unwrap_or(&empty), mode);
    }

    fn invalid(&self, action: &'static str) -> EditorError {
        EditorError::InvalidTransition {
            state: self.mode,
            action,
        }
    }

    fn check_node(&self, id: NodeId) -> Result<(), EditorError> {
        if self.surface.contains(id) {
            Ok(())
        } else {
            Err(EditorError::UnknownNode(id))
        }
    }

    // ── event dispatch ──────────────────────────────────────────────────────

    pub fn handle(&mut self, event: SurfaceEvent) -> Result<EventOutcome, EditorError> {
        match event {
            SurfaceEvent::Click { target } => self.click(target),
            SurfaceEvent::Key { target, press } => self.key(target, press),
            SurfaceEvent::DragStart { handle } => {
                self.check_node(handle)?;
                Ok(outcome(self.drag_start(handle)))
            }
            SurfaceEvent::DragOver { target, pointer_y } => {
                self.check_node(target)?;
                Ok(outcome(self.drag_over(target, pointer_y).is_some()))
            }
            SurfaceEvent::DragEnd => Ok(outcome(self.drag_end().is_some())),
        }
    }

    /// Dispatches a click on `target` to the control that owns it.
    pub fn click(&mut self, target: NodeId) -> Result<EventOutcome, EditorError> {
        self.check_node(target)?;
        let action = self
            .surface
            .closest(target, |node, _| node.element().is_some_and(|el| el.action.is_some()))
            .and_then(|control| self.surface.element(control))
            .and_then(|el| el.action);
        let Some(action) = action else {
            return Ok(EventOutcome::ignored());
        };

        match action {
            Action::Edit => self.enter_edit().map(|_| EventOutcome::handled()),
            Action::Save => self.save().map(|_| EventOutcome::handled()),
            Action::Cancel => self.cancel().map(|_| EventOutcome::handled()),
            structural => {
                if self.mode != EditMode::Editing {
                    debug!(action = structural.name(), "Structural action outside edit mode");
                    return Ok(EventOutcome::ignored());
                }
                let applied = match structural {
                    Action::AddRole => structure::add_role(&mut self.surface, target).is_some(),
                    Action::DeleteRole => structure::delete_role(&mut self.surface, target),
                    Action::AddBullet => structure::add_bullet(&mut self.surface, target).is_some(),
                    Action::DeleteBullet => structure::delete_bullet(&mut self.surface, target),
                    Action::Edit | Action::Save | Action::Cancel => false,
                };
                Ok(outcome(applied))
            }
        }
    }

    pub fn key(&mut self, target: NodeId, press: KeyPress) -> Result<EventOutcome, EditorError> {
        self.check_node(target)?;
        let result = handle_key(&mut self.surface, target, press);
        Ok(EventOutcome {
            handled: result.prevent_default,
            prevent_default: result.prevent_default,
        })
    }

    pub fn drag_start(&mut self, handle: NodeId) -> bool {
        self.drag.start(&self.surface, handle)
    }

    pub fn drag_over(&mut self, target: NodeId, pointer_y: f32) -> Option<DropPosition> {
        self.drag
            .over(&mut self.surface, self.geometry.as_ref(), target, pointer_y)
    }

    pub fn drag_end(&mut self) -> Option<NodeId> {
        self.drag.end()
    }

    /// Flattened lines of the saved document for the export adapters.
    pub fn export_lines(&self) -> Result<Vec<ExportLine>, EditorError> {
        self.document
            .as_ref()
            .map(flatten)
            .ok_or(EditorError::NoDocument)
    }
}

fn outcome(handled: bool) -> EventOutcome {
    if handled {
        EventOutcome::handled()
    } else {
        EventOutcome::ignored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::bridge::Key;
    use crate::models::document::fixtures::sample_document;
    use crate::models::document::{HeaderField, SectionBody};
    use crate::surface::{Container, DragScope, Element, FieldPath, Tag};
    use serde_json::json;

    fn loaded() -> EditSession {
        let mut session = EditSession::new();
        session.load(sample_document());
        session
    }

    fn control(session: &EditSession, action: Action) -> NodeId {
        let surface = session.surface();
        surface
            .descendants(surface.root())
            .into_iter()
            .find(|id| surface.element(*id).and_then(|e| e.action) == Some(action))
            .unwrap()
    }

    fn sections(session: &EditSession) -> Vec<NodeId> {
        let surface = session.surface();
        surface
            .descendants(surface.root())
            .into_iter()
            .filter(|id| matches!(surface.container(*id), Some(Container::Section(_))))
            .collect()
    }

    #[test]
    fn test_enter_edit_requires_document() {
        let mut session = EditSession::new();
        assert_eq!(session.enter_edit(), Err(EditorError::NoDocument));
        assert_eq!(session.mode(), EditMode::Viewing);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut session = loaded();
        assert_eq!(
            session.save(),
            Err(EditorError::InvalidTransition {
                state: EditMode::Viewing,
                action: "save"
            })
        );
        assert!(session.cancel().is_err());

        session.enter_edit().unwrap();
        assert_eq!(
            session.enter_edit(),
            Err(EditorError::InvalidTransition {
                state: EditMode::Editing,
                action: "enter edit"
            })
        );
    }

    #[test]
    fn test_save_applies_edits_and_returns_to_view() {
        let mut session = loaded();
        session.enter_edit().unwrap();
        let name = session
            .surface()
            .find_by_path(&FieldPath::Header(HeaderField::Name).into())
            .unwrap();
        session.surface_mut().set_text(name, "Ada King");

        session.save().unwrap();

        assert_eq!(session.mode(), EditMode::Viewing);
        assert!(!session.surface().is_editing());
        assert_eq!(session.document().unwrap().header.name, "Ada King");
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut session = loaded();
        session.enter_edit().unwrap();
        let secs = sections(&session);
        session.surface_mut().move_before(secs[4], secs[0]);
        let name = session
            .surface()
            .find_by_path(&FieldPath::Header(HeaderField::Name).into())
            .unwrap();
        session.surface_mut().set_text(name, "Someone Else");

        session.cancel().unwrap();

        assert_eq!(session.document(), Some(&sample_document()));
        assert_eq!(session.mode(), EditMode::Viewing);
    }

    #[test]
    fn test_toolbar_clicks_drive_lifecycle() {
        let mut session = loaded();
        let edit = control(&session, Action::Edit);
        assert!(session.click(edit).unwrap().handled);
        assert_eq!(session.mode(), EditMode::Editing);

        let save = control(&session, Action::Save);
        assert!(session.handle(SurfaceEvent::Click { target: save }).unwrap().handled);
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.document(), Some(&sample_document()));
    }

    #[test]
    fn test_click_on_button_label_resolves_control() {
        let mut session = loaded();
        let edit = control(&session, Action::Edit);
        let label = session.surface().children(edit)[0];
        session.click(label).unwrap();
        assert_eq!(session.mode(), EditMode::Editing);
    }

    #[test]
    fn test_structural_clicks_edit_document_on_save() {
        let mut session = loaded();
        session.enter_edit().unwrap();

        let add_role = control(&session, Action::AddRole);
        session.click(add_role).unwrap();
        let del_bullet = control(&session, Action::DeleteBullet);
        session.click(del_bullet).unwrap();
        session.save().unwrap();

        match &session.document().unwrap().sections[2].body {
            SectionBody::Experience { roles } => {
                assert_eq!(roles.len(), 3);
                assert_eq!(roles[0].bullets.len(), 1);
            }
            other => panic!("expected experience, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let mut session = loaded();
        let ghost = session
            .surface_mut()
            .create_element(Element::new(Tag::Div, "ghost"));
        session.surface_mut().remove(ghost);
        assert_eq!(session.click(ghost), Err(EditorError::UnknownNode(ghost)));
        assert_eq!(
            session.handle(SurfaceEvent::DragOver {
                target: ghost,
                pointer_y: 0.0
            }),
            Err(EditorError::UnknownNode(ghost))
        );
    }

    #[test]
    fn test_keys_and_drags_ignored_while_viewing() {
        let mut session = loaded();
        let secs = sections(&session);
        let out = session
            .handle(SurfaceEvent::Key {
                target: secs[2],
                press: KeyPress::new(Key::Enter),
            })
            .unwrap();
        assert_eq!(out, EventOutcome::default());
        assert!(!session.drag_start(secs[0]));
    }

    #[test]
    fn test_drag_events_reorder_sections() {
        let mut session = loaded();
        session.enter_edit().unwrap();
        let secs = sections(&session);
        let handle = session
            .surface()
            .descendants(secs[2])
            .into_iter()
            .find(|id| {
                session.surface().element(*id).and_then(|e| e.handle) == Some(DragScope::Section)
            })
            .unwrap();

        assert!(session.handle(SurfaceEvent::DragStart { handle }).unwrap().handled);
        let out = session
            .handle(SurfaceEvent::DragOver {
                target: secs[0],
                pointer_y: 0.0,
            })
            .unwrap();
        assert!(out.handled);
        assert!(session.handle(SurfaceEvent::DragEnd).unwrap().handled);
        session.save().unwrap();

        let headings: Vec<_> = session
            .document()
            .unwrap()
            .sections
            .iter()
            .map(|s| s.heading.as_str())
            .collect();
        assert_eq!(
            headings,
            vec!["WORK EXPERIENCE", "PROFESSIONAL SUMMARY", "TECHNICAL SKILLS", "EDUCATION", "PROJECTS"]
        );
    }

    #[test]
    fn test_load_generated_rejects_invalid_and_keeps_state() {
        let mut session = loaded();
        let err = session.load_generated(&json!({"header": "nope", "sections": []}));
        assert!(matches!(err, Err(EditorError::InvalidDocument(_))));
        assert_eq!(session.document(), Some(&sample_document()));
    }

    #[test]
    fn test_load_generated_replaces_document() {
        let mut session = loaded();
        session.enter_edit().unwrap();
        session
            .load_generated(&json!({"header": {"name": "Grace"}, "sections": []}))
            .unwrap();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.document().unwrap().header.name, "Grace");
    }

    #[test]
    fn test_export_lines_requires_document() {
        assert_eq!(EditSession::new().export_lines(), Err(EditorError::NoDocument));
        assert!(!loaded().export_lines().unwrap().is_empty());
    }
}
