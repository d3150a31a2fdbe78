//! Drag-and-drop reordering of sections and roles.
//!
//! The controller splices the live surface on every drag-over; there is no
//! separate order buffer. Roles only move among the roles of the experience
//! section they were rendered in, sections only among sections.

use tracing::debug;

use crate::surface::geometry::Geometry;
use crate::surface::{DragScope, ItemPath, NodeId, Surface, SurfacePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragSubject {
    node: NodeId,
    scope: DragScope,
    key: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    subject: Option<DragSubject>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The container being dragged, if any.
    pub fn subject(&self) -> Option<NodeId> {
        self.subject.map(|s| s.node)
    }

    /// Starts a drag from `handle`. The nearest container of the handle's
    /// scope becomes the subject. Returns whether a drag started.
    pub fn start(&mut self, surface: &Surface, handle: NodeId) -> bool {
        if !surface.is_editing() {
            return false;
        }
        let Some(scope) = surface.element(handle).and_then(|el| el.handle) else {
            return false;
        };
        let Some(node) = closest_in_scope(surface, handle, scope) else {
            return false;
        };

        self.subject = Some(DragSubject {
            node,
            scope,
            key: scope_key(surface, node),
        });
        true
    }

    /// Handles the pointer moving over `target` at vertical position
    /// `pointer_y`. When `target` lies in a same-scope sibling of the subject
    /// the subject is moved before or after it, depending on which half of
    /// the sibling the pointer is in.
    pub fn over(
        &mut self,
        surface: &mut Surface,
        geometry: &dyn Geometry,
        target: NodeId,
        pointer_y: f32,
    ) -> Option<DropPosition> {
        if !surface.is_editing() {
            return None;
        }
        let subject = self.subject?;
        if !surface.contains(subject.node) {
            self.subject = None;
            return None;
        }

        let over = closest_in_scope(surface, target, subject.scope)?;
        if over == subject.node {
            return None;
        }
        let over_key = scope_key(surface, over);
        if over_key != subject.key {
            debug!(
                scope = subject.scope.name(),
                subject_key = ?subject.key,
                target_key = ?over_key,
                "Ignoring cross-scope drag target"
            );
            return None;
        }

        let rect = geometry.bounds(surface, over)?;
        if pointer_y < rect.midpoint() {
            surface.move_before(subject.node, over);
            Some(DropPosition::Before)
        } else {
            surface.move_after(subject.node, over);
            Some(DropPosition::After)
        }
    }

    /// Ends the drag, returning the subject.
    pub fn end(&mut self) -> Option<NodeId> {
        self.subject.take().map(|s| s.node)
    }
}

fn closest_in_scope(surface: &Surface, from: NodeId, scope: DragScope) -> Option<NodeId> {
    surface.closest(from, |node, _| {
        node.element()
            .and_then(|el| el.container)
            .is_some_and(|c| scope.matches(c))
    })
}

/// Sections share one scope. Roles are scoped by the section index recorded
/// when they were rendered or added.
fn scope_key(surface: &Surface, node: NodeId) -> Option<usize> {
    match surface.path_of(node) {
        Some(SurfacePath::Item(ItemPath::Role { section, .. })) => Some(*section),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::render::render;
    use crate::editor::session::EditMode;
    use crate::models::document::fixtures::sample_document;
    use crate::models::document::{Document, Role, Section, SectionBody};
    use crate::surface::geometry::FlowLayout;
    use crate::surface::Container;

    fn sections(surface: &Surface) -> Vec<NodeId> {
        surface
            .descendants(surface.root())
            .into_iter()
            .filter(|id| matches!(surface.container(*id), Some(Container::Section(_))))
            .collect()
    }

    fn handle_in(surface: &Surface, container: NodeId, scope: DragScope) -> NodeId {
        surface
            .descendants(container)
            .into_iter()
            .find(|id| surface.element(*id).and_then(|e| e.handle) == Some(scope))
            .unwrap()
    }

    fn recorded_section(surface: &Surface, id: NodeId) -> usize {
        surface.path_of(id).and_then(|p| p.section()).unwrap()
    }

    #[test]
    fn test_drag_section_above_midpoint_moves_before() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let geometry = FlowLayout::default();
        let secs = sections(&surface);

        let mut drag = DragController::new();
        assert!(drag.start(&surface, handle_in(&surface, secs[2], DragScope::Section)));
        assert_eq!(drag.subject(), Some(secs[2]));

        let top = geometry.bounds(&surface, secs[0]).unwrap().top;
        let pos = drag.over(&mut surface, &geometry, secs[0], top + 1.0);

        assert_eq!(pos, Some(DropPosition::Before));
        let order: Vec<_> = sections(&surface)
            .into_iter()
            .map(|s| recorded_section(&surface, s))
            .collect();
        assert_eq!(order, vec![2, 0, 1, 3, 4]);
        assert_eq!(drag.end(), Some(secs[2]));
        assert_eq!(drag.subject(), None);
    }

    #[test]
    fn test_drag_below_midpoint_moves_after() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let geometry = FlowLayout::default();
        let secs = sections(&surface);

        let mut drag = DragController::new();
        drag.start(&surface, handle_in(&surface, secs[0], DragScope::Section));
        let rect = geometry.bounds(&surface, secs[3]).unwrap();
        // Pointer over a text leaf deep inside the target section.
        let deep = *surface.descendants(secs[3]).last().unwrap();
        let pos = drag.over(&mut surface, &geometry, deep, rect.bottom() - 0.5);

        assert_eq!(pos, Some(DropPosition::After));
        let order: Vec<_> = sections(&surface)
            .into_iter()
            .map(|s| recorded_section(&surface, s))
            .collect();
        assert_eq!(order, vec![1, 2, 3, 0, 4]);
    }

    #[test]
    fn test_drag_over_self_is_noop() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let geometry = FlowLayout::default();
        let secs = sections(&surface);

        let mut drag = DragController::new();
        drag.start(&surface, handle_in(&surface, secs[1], DragScope::Section));
        assert_eq!(drag.over(&mut surface, &geometry, secs[1], 0.0), None);
        assert_eq!(sections(&surface), secs);
    }

    #[test]
    fn test_roles_reorder_within_section() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let geometry = FlowLayout::default();
        let roles = surface.descendants_with(surface.root(), Container::Role);

        let mut drag = DragController::new();
        assert!(drag.start(&surface, handle_in(&surface, roles[1], DragScope::Role)));
        let top = geometry.bounds(&surface, roles[0]).unwrap().top;
        assert_eq!(
            drag.over(&mut surface, &geometry, roles[0], top),
            Some(DropPosition::Before)
        );
        assert_eq!(
            surface.descendants_with(surface.root(), Container::Role),
            vec![roles[1], roles[0]]
        );
    }

    #[test]
    fn test_role_drag_ignores_other_experience_section() {
        let mut doc = sample_document();
        doc.sections.push(Section {
            heading: "VOLUNTEERING".to_string(),
            body: SectionBody::Experience {
                roles: vec![Role {
                    role_title: "Mentor".to_string(),
                    ..Role::default()
                }],
            },
        });
        let mut surface = render(&doc, EditMode::Editing);
        let geometry = FlowLayout::default();
        let roles = surface.descendants_with(surface.root(), Container::Role);
        assert_eq!(roles.len(), 3);
        let before = roles.clone();

        let mut drag = DragController::new();
        drag.start(&surface, handle_in(&surface, roles[0], DragScope::Role));
        let top = geometry.bounds(&surface, roles[2]).unwrap().top;

        assert_eq!(drag.over(&mut surface, &geometry, roles[2], top), None);
        assert_eq!(surface.descendants_with(surface.root(), Container::Role), before);
    }

    #[test]
    fn test_role_drag_does_not_target_sections() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let geometry = FlowLayout::default();
        let secs = sections(&surface);
        let roles = surface.descendants_with(surface.root(), Container::Role);

        let mut drag = DragController::new();
        drag.start(&surface, handle_in(&surface, roles[0], DragScope::Role));
        assert_eq!(drag.over(&mut surface, &geometry, secs[0], 0.0), None);
        assert_eq!(sections(&surface), secs);
    }

    #[test]
    fn test_inactive_outside_edit_mode() {
        let doc = Document::default();
        let surface = render(&doc, EditMode::Viewing);
        let mut drag = DragController::new();
        assert!(!drag.start(&surface, surface.root()));
        assert_eq!(drag.subject(), None);
    }

    #[test]
    fn test_over_without_subject_is_ignored() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let secs = sections(&surface);
        let mut drag = DragController::new();
        assert_eq!(drag.over(&mut surface, &FlowLayout::default(), secs[0], 0.0), None);
    }
}
