//! Document → surface.
//!
//! Rendering is pure and total: any `Document` renders, empty collections
//! render as empty containers. Every editable field gets a [`FieldPath`] and
//! every reorderable container an [`ItemPath`], both carrying render-time
//! indices. In view mode nothing is editable and the drag handles and
//! structural controls are not emitted at all; the toolbar shows Edit in view
//! mode and Save/Cancel in edit mode.

use crate::editor::session::EditMode;
use crate::models::document::{
    Document, HeaderField, InlineItem, Role, RoleField, Section, SectionBody, SkillGroup,
};
use crate::models::inline::InlineText;
use crate::surface::{
    Action, Container, DragScope, Element, FieldPath, ItemPath, NodeId, Surface, Tag,
};

/// Placeholder content of a role added from the surface.
pub const NEW_ROLE_TITLE: &str = "Position Title";
pub const NEW_ROLE_COMPANY: &str = "Company Name";
pub const NEW_ROLE_START: &str = "Month YYYY";
pub const NEW_ROLE_END: &str = "Present";
pub const NEW_ROLE_BULLET: &str =
    "Add your first impact bullet (Ctrl/Cmd+B to bold tech/metrics).";

pub fn render(document: &Document, mode: EditMode) -> Surface {
    let mut surface = Surface::new(mode);
    let editing = mode == EditMode::Editing;
    let root = surface.root();

    render_toolbar(&mut surface, root, editing);

    let paper = surface.append_element(root, Element::new(Tag::Div, "paper"));
    render_header(&mut surface, paper, document, editing);

    let sections_root = surface.append_element(
        paper,
        Element::new(Tag::Div, "sectionsRoot").container(Container::Sections),
    );
    for (index, section) in document.sections.iter().enumerate() {
        render_section(&mut surface, sections_root, index, section, editing);
    }

    surface
}

fn render_toolbar(surface: &mut Surface, root: NodeId, editing: bool) {
    let toolbar = surface.append_element(root, Element::new(Tag::Div, "paperToolbar"));
    for (action, label, visible) in [
        (Action::Edit, "Edit", !editing),
        (Action::Save, "Save", editing),
        (Action::Cancel, "Cancel", editing),
    ] {
        let button = surface.append_element(
            toolbar,
            Element::new(Tag::Button, "iconBtn").action(action).visible(visible),
        );
        surface.append_text(button, label);
    }
}

fn render_header(surface: &mut Surface, paper: NodeId, document: &Document, editing: bool) {
    let header = &document.header;

    let name_line = surface.append_element(paper, Element::new(Tag::Heading, "hName"));
    header_field(surface, name_line, header.get(HeaderField::Name), HeaderField::Name, editing);
    separator(surface, name_line, " - ");
    header_field(surface, name_line, header.get(HeaderField::Title), HeaderField::Title, editing);

    let contact = surface.append_element(paper, Element::new(Tag::Div, "hContact"));
    let contact_fields = [HeaderField::Phone, HeaderField::Email, HeaderField::Location];
    for (i, field) in contact_fields.into_iter().enumerate() {
        if i > 0 {
            separator(surface, contact, " | ");
        }
        header_field(surface, contact, header.get(field), field, editing);
    }
}

fn header_field(
    surface: &mut Surface,
    parent: NodeId,
    value: &str,
    field: HeaderField,
    editing: bool,
) {
    let span = surface.append_element(parent, Element::new(Tag::Span, "editable").editable(editing));
    surface.set_text(span, value);
    surface.set_path(span, FieldPath::Header(field).into());
}

fn separator(surface: &mut Surface, parent: NodeId, text: &str) {
    let span = surface.append_element(parent, Element::new(Tag::Span, ""));
    surface.append_text(span, text);
}

fn render_section(
    surface: &mut Surface,
    sections_root: NodeId,
    index: usize,
    section: &Section,
    editing: bool,
) {
    let section_el = surface.append_element(
        sections_root,
        Element::new(Tag::Section, "section").container(Container::Section(section.kind())),
    );
    surface.set_path(section_el, ItemPath::Section { index }.into());

    let head_row = surface.append_element(section_el, Element::new(Tag::Div, "sectionRow"));
    if editing {
        let handle = surface.append_element(
            head_row,
            Element::new(Tag::Span, "dragHandle").handle(DragScope::Section),
        );
        surface.append_text(handle, "⋮⋮");
    }
    let heading = surface.append_element(head_row, Element::new(Tag::Div, "secHead"));
    surface.set_text(heading, &section.heading);
    surface.append_element(section_el, Element::new(Tag::Div, "rule"));

    match &section.body {
        SectionBody::Summary { inline } => {
            rich_field(
                surface,
                section_el,
                "editable",
                inline,
                Some(FieldPath::SectionInline { section: index }),
                editing,
            );
        }
        SectionBody::Skills { groups } => {
            for (group_index, group) in groups.iter().enumerate() {
                skill_row(surface, section_el, index, group_index, group, editing);
            }
        }
        SectionBody::Experience { roles } => {
            let roles_root = surface.append_element(
                section_el,
                Element::new(Tag::Div, "rolesRoot").container(Container::Roles),
            );
            for (role_index, role) in roles.iter().enumerate() {
                let card = role_card(surface, index, role_index, role, editing);
                surface.append_child(roles_root, card);
            }
            if editing {
                let bar = surface.append_element(section_el, Element::new(Tag::Div, "addBar"));
                let add = surface.append_element(
                    bar,
                    Element::new(Tag::Button, "miniBtn primary").action(Action::AddRole),
                );
                surface.append_text(add, "+ Add Work Experience");
            }
        }
        SectionBody::Education { items } | SectionBody::Generic { items } => {
            for (item_index, item) in items.iter().enumerate() {
                rich_field(
                    surface,
                    section_el,
                    "editable",
                    &item.inline,
                    Some(FieldPath::ItemInline {
                        section: index,
                        item: item_index,
                    }),
                    editing,
                );
            }
        }
    }
}

fn skill_row(
    surface: &mut Surface,
    section_el: NodeId,
    section: usize,
    group: usize,
    skill_group: &SkillGroup,
    editing: bool,
) {
    let row = surface.append_element(
        section_el,
        Element::new(Tag::Div, "skillRow").container(Container::SkillGroup),
    );
    surface.set_path(row, ItemPath::Group { section, index: group }.into());

    let label = surface.append_element(row, Element::new(Tag::Strong, "editable").editable(editing));
    surface.set_text(label, &skill_group.label);
    surface.set_path(label, FieldPath::GroupLabel { section, group }.into());

    surface.append_text(row, ": ");

    let items = surface.append_element(row, Element::new(Tag::Span, "editable").editable(editing));
    surface.set_text(items, &skill_group.items.join(", "));
    surface.set_path(items, FieldPath::GroupItems { section, group }.into());
}

/// Builds a detached role card. Used by the renderer and by "add role".
pub(crate) fn role_card(
    surface: &mut Surface,
    section: usize,
    index: usize,
    role: &Role,
    editing: bool,
) -> NodeId {
    let card = surface.create_element(Element::new(Tag::Div, "roleCard").container(Container::Role));
    surface.set_path(card, ItemPath::Role { section, index }.into());

    let top = surface.append_element(card, Element::new(Tag::Div, "roleTop"));
    if editing {
        let handle = surface.append_element(
            top,
            Element::new(Tag::Span, "roleDrag").handle(DragScope::Role),
        );
        surface.append_text(handle, "⋮⋮ Drag");
    }

    let line = surface.append_element(top, Element::new(Tag::Div, "roleLine"));
    let separators = ["", " @ ", " | ", " – "];
    for (field, sep) in RoleField::ALL.into_iter().zip(separators) {
        if !sep.is_empty() {
            separator(surface, line, sep);
        }
        let tag = if field == RoleField::RoleTitle { Tag::Strong } else { Tag::Span };
        let span = surface.append_element(line, Element::new(tag, "editable").editable(editing));
        surface.set_text(span, role.get(field));
        surface.set_path(
            span,
            FieldPath::RoleField {
                section,
                role: index,
                field,
            }
            .into(),
        );
    }

    if editing {
        let actions = surface.append_element(top, Element::new(Tag::Div, "miniActions"));
        let add = surface.append_element(
            actions,
            Element::new(Tag::Button, "miniBtn").action(Action::AddBullet),
        );
        surface.append_text(add, "+ Bullet");
        let del = surface.append_element(
            actions,
            Element::new(Tag::Button, "miniBtn danger").action(Action::DeleteRole),
        );
        surface.append_text(del, "✖");
    }

    let list = surface.append_element(
        card,
        Element::new(Tag::List, "bullets").container(Container::Bullets),
    );
    for (bullet_index, bullet) in role.bullets.iter().enumerate() {
        let (item, _) = bullet_item(
            surface,
            &bullet.inline,
            Some(FieldPath::BulletInline {
                section,
                role: index,
                bullet: bullet_index,
            }),
            editing,
        );
        surface.append_child(list, item);
    }

    card
}

/// Builds a detached bullet list item. Returns `(item, rich field)`.
///
/// Bullets created live carry no path; the reconciler reads bullets by
/// position inside their role.
pub(crate) fn bullet_item(
    surface: &mut Surface,
    inline: &InlineText,
    path: Option<FieldPath>,
    editing: bool,
) -> (NodeId, NodeId) {
    let item = surface.create_element(Element::new(Tag::ListItem, "").container(Container::Bullet));
    let field = rich_field(surface, item, "editable", inline, path, editing);
    if editing {
        let del = surface.append_element(
            item,
            Element::new(Tag::Button, "bulletX").action(Action::DeleteBullet),
        );
        surface.append_text(del, "✖");
    }
    (item, field)
}

/// The role added by the "add role" control.
pub(crate) fn placeholder_role() -> Role {
    Role {
        role_title: NEW_ROLE_TITLE.to_string(),
        company: NEW_ROLE_COMPANY.to_string(),
        start: NEW_ROLE_START.to_string(),
        end: NEW_ROLE_END.to_string(),
        bullets: vec![InlineItem::new(InlineText::plain(NEW_ROLE_BULLET))],
    }
}

fn rich_field(
    surface: &mut Surface,
    parent: NodeId,
    class: &'static str,
    inline: &InlineText,
    path: Option<FieldPath>,
    editing: bool,
) -> NodeId {
    let field = surface.append_element(parent, Element::new(Tag::Div, class).editable(editing).rich());
    surface.set_rich_content(field, inline.runs());
    if let Some(path) = path {
        surface.set_path(field, path.into());
    }
    field
}
