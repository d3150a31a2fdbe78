//! Surface ↔ InlineText, plus the live key handling of bullet lines.

use crate::editor::render::bullet_item;
use crate::models::inline::{normalize, InlineText, Run};
use crate::surface::{Container, NodeId, NodeKind, Surface, Tag};

/// Reads a rich field back into normalized [`InlineText`].
///
/// Text leaves are concatenated in document order; every leaf below a bold
/// wrapper is bold.
pub fn surface_node_to_inline(surface: &Surface, node: NodeId) -> InlineText {
    let mut runs = Vec::new();
    collect_runs(surface, node, false, &mut runs);
    normalize(runs)
}

fn collect_runs(surface: &Surface, id: NodeId, bold: bool, out: &mut Vec<Run>) {
    let Some(node) = surface.node(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(text) => {
            if !text.is_empty() {
                out.push(Run::new(text.as_str(), bold));
            }
        }
        NodeKind::Element(el) => {
            let bold = bold || el.tag == Tag::Strong;
            for &child in surface.children(id) {
                collect_runs(surface, child, bold, out);
            }
        }
    }
}

/// Writes `inline` into a rich field, replacing its content.
pub fn write_inline(surface: &mut Surface, node: NodeId, inline: &InlineText) {
    surface.set_rich_content(node, inline.runs());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// The soft-break modifier.
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub prevent_default: bool,
    pub focus: Option<NodeId>,
}

/// The rich field and bullet item that own `target`, if `target` is inside
/// a bullet.
pub fn bullet_of(surface: &Surface, target: NodeId) -> Option<(NodeId, NodeId)> {
    let field = surface.closest(target, |node, _| node.element().is_some_and(|el| el.rich))?;
    let item = surface.closest_container(field, Container::Bullet)?;
    Some((field, item))
}

fn field_of_item(surface: &Surface, item: NodeId) -> Option<NodeId> {
    surface
        .descendants(item)
        .into_iter()
        .find(|id| surface.element(*id).is_some_and(|el| el.rich))
}

/// Applies the bullet-line key behaviour. Keys outside a bullet, and keys in
/// a surface that is not being edited, are left to the host.
///
/// * Enter without shift: a new empty bullet is inserted right after the
///   current one and focused.
/// * Backspace on a bullet with no visible text: the bullet is removed and
///   focus moves to the previous bullet, else the next.
pub fn handle_key(surface: &mut Surface, target: NodeId, press: KeyPress) -> KeyOutcome {
    if !surface.is_editing() {
        return KeyOutcome::default();
    }
    let Some((field, item)) = bullet_of(surface, target) else {
        return KeyOutcome::default();
    };

    match press.key {
        Key::Enter if !press.shift => {
            let Some(list) = surface.parent(item) else {
                return KeyOutcome::default();
            };
            let (new_item, new_field) = bullet_item(surface, &InlineText::empty(), None, true);
            let next = surface.next_sibling(item);
            surface.insert_before(list, new_item, next);
            surface.set_focus(Some(new_field));
            KeyOutcome {
                prevent_default: true,
                focus: Some(new_field),
            }
        }
        Key::Backspace if surface.text_content(field).trim().is_empty() => {
            let neighbour = surface
                .prev_sibling(item)
                .or_else(|| surface.next_sibling(item))
                .and_then(|sibling| field_of_item(surface, sibling));
            surface.remove(item);
            surface.set_focus(neighbour);
            KeyOutcome {
                prevent_default: true,
                focus: neighbour,
            }
        }
        _ => KeyOutcome::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::render::render;
    use crate::editor::session::EditMode;
    use crate::models::document::fixtures::sample_document;
    use crate::surface::{Element, FieldPath};

    fn bullet_field(surface: &Surface, role: usize, bullet: usize) -> NodeId {
        surface
            .find_by_path(
                &FieldPath::BulletInline {
                    section: 2,
                    role,
                    bullet,
                }
                .into(),
            )
            .unwrap()
    }

    fn bullets_of_role(surface: &Surface, field: NodeId) -> Vec<NodeId> {
        let list = surface
            .closest_container(field, Container::Bullets)
            .unwrap();
        surface.children(list).to_vec()
    }

    #[test]
    fn test_nested_bold_wrappers() {
        let mut surface = Surface::new(EditMode::Editing);
        let root = surface.root();
        let field = surface.append_element(root, Element::new(Tag::Div, "editable").rich());
        surface.append_text(field, "Led");
        let strong = surface.append_element(field, Element::new(Tag::Strong, ""));
        let span = surface.append_element(strong, Element::new(Tag::Span, ""));
        surface.append_text(span, "Rust");
        surface.append_text(strong, "migration");
        surface.append_text(field, ", on time");

        let inline = surface_node_to_inline(&surface, field);
        let runs: Vec<_> = inline.runs().iter().map(|r| (r.text.as_str(), r.bold)).collect();
        assert_eq!(runs, vec![("Led ", false), ("Rustmigration", true), (", on time", false)]);
    }

    #[test]
    fn test_empty_field_reads_as_fallback() {
        let mut surface = Surface::new(EditMode::Editing);
        let root = surface.root();
        let field = surface.append_element(root, Element::new(Tag::Div, "editable").rich());
        assert_eq!(surface_node_to_inline(&surface, field), InlineText::empty());
    }

    #[test]
    fn test_write_then_read_is_stable() {
        let mut surface = Surface::new(EditMode::Editing);
        let root = surface.root();
        let field = surface.append_element(root, Element::new(Tag::Div, "editable").rich());
        let inline = normalize(vec![Run::bold("React"), Run::plain("Developer")]);

        write_inline(&mut surface, field, &inline);
        assert_eq!(surface_node_to_inline(&surface, field), inline);
    }

    #[test]
    fn test_embolden_is_read_back_as_bold_run() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let field = bullet_field(&surface, 0, 1);
        let leaf = surface.children(field)[0];

        // "Mentored 6 engineers." → bold "6 engineers"
        surface.embolden(leaf, 9..20).unwrap();

        let inline = surface_node_to_inline(&surface, field);
        let runs: Vec<_> = inline.runs().iter().map(|r| (r.text.as_str(), r.bold)).collect();
        assert_eq!(runs, vec![("Mentored ", false), ("6 engineers", true), (".", false)]);
    }

    #[test]
    fn test_enter_inserts_bullet_after_current() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let first = bullet_field(&surface, 0, 0);
        let leaf = surface.children(first)[0];
        let before = bullets_of_role(&surface, first);

        let outcome = handle_key(&mut surface, leaf, KeyPress::new(Key::Enter));

        let after = bullets_of_role(&surface, first);
        assert!(outcome.prevent_default);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[1]);
        let new_field = field_of_item(&surface, after[1]).unwrap();
        assert_eq!(outcome.focus, Some(new_field));
        assert_eq!(surface.focus(), Some(new_field));
        assert!(surface.text_content(new_field).is_empty());
    }

    #[test]
    fn test_shift_enter_is_left_to_host() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let first = bullet_field(&surface, 0, 0);
        let before = bullets_of_role(&surface, first).len();

        let outcome = handle_key(&mut surface, first, KeyPress::new(Key::Enter).with_shift());

        assert_eq!(outcome, KeyOutcome::default());
        assert_eq!(bullets_of_role(&surface, first).len(), before);
    }

    #[test]
    fn test_enter_outside_bullets_is_ignored() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let summary = surface
            .find_by_path(&FieldPath::SectionInline { section: 0 }.into())
            .unwrap();
        let outcome = handle_key(&mut surface, summary, KeyPress::new(Key::Enter));
        assert!(!outcome.prevent_default);
    }

    #[test]
    fn test_backspace_on_empty_bullet_focuses_previous() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let second = bullet_field(&surface, 0, 1);
        let first = bullet_field(&surface, 0, 0);
        surface.set_text(second, "  ");

        let outcome = handle_key(&mut surface, second, KeyPress::new(Key::Backspace));

        assert!(outcome.prevent_default);
        assert!(!surface.contains(second));
        assert_eq!(outcome.focus, Some(first));
        assert_eq!(bullets_of_role(&surface, first).len(), 1);
    }

    #[test]
    fn test_backspace_on_first_bullet_focuses_next() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let first = bullet_field(&surface, 0, 0);
        let second = bullet_field(&surface, 0, 1);
        surface.set_text(first, "");

        let outcome = handle_key(&mut surface, first, KeyPress::new(Key::Backspace));

        assert_eq!(outcome.focus, Some(second));
    }

    #[test]
    fn test_backspace_with_text_is_left_to_host() {
        let mut surface = render(&sample_document(), EditMode::Editing);
        let first = bullet_field(&surface, 0, 0);
        let outcome = handle_key(&mut surface, first, KeyPress::new(Key::Backspace));
        assert!(!outcome.prevent_default);
        assert!(surface.contains(first));
    }

    #[test]
    fn test_keys_ignored_in_view_mode() {
        let mut surface = render(&sample_document(), EditMode::Viewing);
        let first = bullet_field(&surface, 0, 0);
        let outcome = handle_key(&mut surface, first, KeyPress::new(Key::Enter));
        assert_eq!(outcome, KeyOutcome::default());
    }
}
