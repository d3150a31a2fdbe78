//! Surface → Document, on save.
//!
//! Structure and order come from the live surface; each section's heading and
//! type come from the section it was rendered from, resolved through the index
//! recorded at render time. Sections whose recorded index no longer resolves
//! are skipped. Blank lines and bullets are dropped.

use tracing::debug;

use crate::editor::bridge::surface_node_to_inline;
use crate::models::document::{Document, HeaderField, InlineItem, Role, SectionBody, SkillGroup};
use crate::surface::{Container, FieldPath, ItemPath, NodeId, Surface, SurfacePath};

/// Rebuilds a document from `surface`, using `previous` for everything the
/// surface does not carry. `previous` is left untouched.
pub fn reconcile(surface: &Surface, previous: &Document) -> Document {
    let mut next = previous.clone();

    for field in HeaderField::ALL {
        if let Some(node) = surface.find_by_path(&FieldPath::Header(field).into()) {
            next.header.set(field, surface.text_content(node).trim().to_string());
        }
    }

    let live_sections: Vec<NodeId> = surface
        .descendants(surface.root())
        .into_iter()
        .filter(|id| matches!(surface.container(*id), Some(Container::Section(_))))
        .collect();

    next.sections = live_sections
        .into_iter()
        .filter_map(|node| {
            let index = match surface.path_of(node) {
                Some(SurfacePath::Item(ItemPath::Section { index })) => *index,
                _ => {
                    debug!(node = %node, "Section container without recorded index, skipping");
                    return None;
                }
            };
            let Some(original) = previous.sections.get(index) else {
                debug!(index, "Recorded section index no longer resolves, skipping");
                return None;
            };

            let mut section = original.clone();
            read_section_body(surface, node, &mut section.body);
            Some(section)
        })
        .collect();

    next
}

fn read_section_body(surface: &Surface, node: NodeId, body: &mut SectionBody) {
    match body {
        SectionBody::Summary { inline } => {
            if let Some(field) = rich_fields(surface, node).into_iter().next() {
                *inline = surface_node_to_inline(surface, field);
            }
        }
        SectionBody::Skills { groups } => {
            *groups = surface
                .descendants_with(node, Container::SkillGroup)
                .into_iter()
                .map(|group| read_skill_group(surface, group))
                .collect();
        }
        SectionBody::Experience { roles } => {
            *roles = surface
                .descendants_with(node, Container::Role)
                .into_iter()
                .map(|role| read_role(surface, role))
                .collect();
        }
        SectionBody::Education { items } | SectionBody::Generic { items } => {
            *items = read_lines(surface, &rich_fields(surface, node));
        }
    }
}

fn read_skill_group(surface: &Surface, group: NodeId) -> SkillGroup {
    let mut out = SkillGroup::default();
    for id in surface.descendants(group) {
        match surface.path_of(id) {
            Some(SurfacePath::Field(FieldPath::GroupLabel { .. })) => {
                out.label = surface.text_content(id).trim().to_string();
            }
            Some(SurfacePath::Field(FieldPath::GroupItems { .. })) => {
                out.items = split_items(&surface.text_content(id));
            }
            _ => {}
        }
    }
    out
}

/// Comma-separated list → trimmed, non-empty items.
pub fn split_items(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_role(surface: &Surface, role: NodeId) -> Role {
    let mut out = Role::default();
    // Match on the field kind only; indices inside the path are render-time.
    for id in surface.descendants(role) {
        if let Some(SurfacePath::Field(FieldPath::RoleField { field, .. })) = surface.path_of(id) {
            out.set(*field, surface.text_content(id).trim().to_string());
        }
    }

    let bullet_fields: Vec<NodeId> = surface
        .descendants_with(role, Container::Bullet)
        .into_iter()
        .filter_map(|bullet| rich_fields(surface, bullet).into_iter().next())
        .collect();
    out.bullets = read_lines(surface, &bullet_fields);
    out
}

fn read_lines(surface: &Surface, fields: &[NodeId]) -> Vec<InlineItem> {
    fields
        .iter()
        .map(|field| surface_node_to_inline(surface, *field))
        .filter(|inline| !inline.is_blank())
        .map(InlineItem::new)
        .collect()
}

fn rich_fields(surface: &Surface, under: NodeId) -> Vec<NodeId> {
    surface
        .descendants(under)
        .into_iter()
        .filter(|id| surface.element(*id).is_some_and(|el| el.rich))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::bridge::{handle_key, Key, KeyPress};
    use crate::editor::render::{render, NEW_ROLE_BULLET, NEW_ROLE_TITLE};
    use crate::editor::session::EditMode;
    use crate::editor::structure::{add_bullet, add_role, delete_bullet};
    use crate::models::document::fixtures::sample_document;
    use crate::models::document::RoleField;
    use crate::models::inline::Run;
    use crate::surface::Action;

    fn sections(surface: &Surface) -> Vec<NodeId> {
        surface
            .descendants(surface.root())
            .into_iter()
            .filter(|id| matches!(surface.container(*id), Some(Container::Section(_))))
            .collect()
    }

    fn field(surface: &Surface, path: FieldPath) -> NodeId {
        surface.find_by_path(&path.into()).unwrap()
    }

    fn roles_of(doc: &Document, section: usize) -> &[Role] {
        match &doc.sections[section].body {
            SectionBody::Experience { roles } => roles,
            other => panic!("expected experience, got {other:?}"),
        }
    }

    fn control(surface: &Surface, under: NodeId, action: Action) -> NodeId {
        surface
            .descendants(under)
            .into_iter()
            .find(|id| surface.element(*id).and_then(|e| e.action) == Some(action))
            .unwrap()
    }

    #[test]
    fn test_round_trip_without_edits() {
        let doc = sample_document();
        let surface = render(&doc, EditMode::Editing);
        assert_eq!(reconcile(&surface, &doc), doc);
    }

    #[test]
    fn test_round_trip_from_view_mode() {
        let doc = sample_document();
        let surface = render(&doc, EditMode::Viewing);
        assert_eq!(reconcile(&surface, &doc), doc);
    }

    #[test]
    fn test_section_moved_before_first() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let secs = sections(&surface);
        surface.move_before(secs[2], secs[0]);

        let next = reconcile(&surface, &doc);

        assert_eq!(next.sections.len(), 5);
        assert_eq!(next.sections[0], doc.sections[2]);
        assert_eq!(next.sections[1], doc.sections[0]);
        assert_eq!(next.sections[2], doc.sections[1]);
        assert_eq!(next.sections[3..], doc.sections[3..]);
    }

    #[test]
    fn test_header_and_role_edits_are_read_and_trimmed() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let name = field(&surface, FieldPath::Header(HeaderField::Name));
        surface.set_text(name, "  Ada King ");
        let company = field(
            &surface,
            FieldPath::RoleField {
                section: 2,
                role: 1,
                field: RoleField::Company,
            },
        );
        surface.set_text(company, "Difference Engines Ltd");

        let next = reconcile(&surface, &doc);

        assert_eq!(next.header.name, "Ada King");
        assert_eq!(roles_of(&next, 2)[1].company, "Difference Engines Ltd");
        assert_eq!(doc.header.name, "Ada Lovelace");
    }

    #[test]
    fn test_skill_items_are_split_and_trimmed() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let items = field(&surface, FieldPath::GroupItems { section: 1, group: 0 });
        surface.set_text(items, " Rust ,, Go,  Zig ,");

        let next = reconcile(&surface, &doc);

        match &next.sections[1].body {
            SectionBody::Skills { groups } => {
                assert_eq!(groups[0].items, vec!["Rust", "Go", "Zig"]);
                assert_eq!(groups[1].label, "Cloud");
            }
            other => panic!("expected skills, got {other:?}"),
        }
    }

    #[test]
    fn test_add_then_delete_bullet_keeps_count() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let role = surface.descendants_with(surface.root(), Container::Role)[0];

        let add = control(&surface, role, Action::AddBullet);
        let new_field = add_bullet(&mut surface, add).unwrap();
        let item = surface.closest_container(new_field, Container::Bullet).unwrap();
        let delete = control(&surface, item, Action::DeleteBullet);
        assert!(delete_bullet(&mut surface, delete));

        let next = reconcile(&surface, &doc);
        assert_eq!(roles_of(&next, 2)[0].bullets.len(), roles_of(&doc, 2)[0].bullets.len());
    }

    #[test]
    fn test_blank_bullet_is_dropped() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let first = field(
            &surface,
            FieldPath::BulletInline {
                section: 2,
                role: 0,
                bullet: 0,
            },
        );
        // Enter creates an empty bullet; the user then types only spaces.
        let outcome = handle_key(&mut surface, first, KeyPress::new(Key::Enter));
        let blank = outcome.focus.unwrap();
        surface.set_text(blank, "   ");

        let next = reconcile(&surface, &doc);
        assert_eq!(roles_of(&next, 2)[0].bullets, roles_of(&doc, 2)[0].bullets);
    }

    #[test]
    fn test_pasted_and_emboldened_content_is_normalized() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let summary = field(&surface, FieldPath::SectionInline { section: 0 });
        surface.set_rich_content(
            summary,
            &[Run::bold("React"), Run::plain("Developer\u{00A0}with"), Run::plain(" **flair**")],
        );

        let next = reconcile(&surface, &doc);

        match &next.sections[0].body {
            SectionBody::Summary { inline } => {
                assert_eq!(inline.plain_text(), "React Developer with flair");
                assert!(inline.runs()[0].bold);
            }
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_added_role_carries_placeholders() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let add = control(&surface, surface.root(), Action::AddRole);
        add_role(&mut surface, add).unwrap();

        let next = reconcile(&surface, &doc);
        let roles = roles_of(&next, 2);
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[2].role_title, NEW_ROLE_TITLE);
        assert_eq!(roles[2].bullets[0].inline.plain_text(), NEW_ROLE_BULLET);
    }

    #[test]
    fn test_blank_education_line_is_dropped() {
        let doc = sample_document();
        let mut surface = render(&doc, EditMode::Editing);
        let line = field(&surface, FieldPath::ItemInline { section: 3, item: 0 });
        surface.set_text(line, "");

        let next = reconcile(&surface, &doc);
        assert_eq!(next.sections[3].body, SectionBody::Education { items: vec![] });
    }

    #[test]
    fn test_unresolvable_section_index_is_skipped() {
        let doc = sample_document();
        let surface = render(&doc, EditMode::Editing);
        let mut shorter = doc.clone();
        shorter.sections.truncate(3);

        let next = reconcile(&surface, &shorter);
        assert_eq!(next.sections, shorter.sections);
    }

    #[test]
    fn test_split_items() {
        assert_eq!(split_items(""), Vec::<String>::new());
        assert_eq!(split_items("a, b ,c"), vec!["a", "b", "c"]);
    }
}
