//! Structural edits driven by the role/bullet controls.
//!
//! Each operation resolves its target from the clicked control by walking up
//! to the nearest owning container, so it stays correct after the surface has
//! been reordered.

use tracing::debug;

use crate::editor::render::{bullet_item, placeholder_role, role_card};
use crate::models::inline::InlineText;
use crate::surface::{Container, ItemPath, NodeId, Surface, SurfacePath};

/// Appends a placeholder role at the bottom of the experience section that
/// owns `control`. Returns the new role card.
pub fn add_role(surface: &mut Surface, control: NodeId) -> Option<NodeId> {
    let section = surface.closest_section(control)?;
    let Some(SurfacePath::Item(ItemPath::Section { index })) = surface.path_of(section).copied()
    else {
        debug!(node = %section, "Section without a recorded index, not adding role");
        return None;
    };
    let roles_root = surface.descendants_with(section, Container::Roles).into_iter().next()?;

    let next_index = surface.children(roles_root).len();
    let editing = surface.is_editing();
    let card = role_card(surface, index, next_index, &placeholder_role(), editing);
    surface.append_child(roles_root, card);
    Some(card)
}

/// Removes the role that owns `control`.
pub fn delete_role(surface: &mut Surface, control: NodeId) -> bool {
    match surface.closest_container(control, Container::Role) {
        Some(role) => {
            surface.remove(role);
            true
        }
        None => false,
    }
}

/// Appends an empty bullet to the role that owns `control` and focuses it.
/// Returns the new bullet's rich field.
pub fn add_bullet(surface: &mut Surface, control: NodeId) -> Option<NodeId> {
    let role = surface.closest_container(control, Container::Role)?;
    let list = surface.descendants_with(role, Container::Bullets).into_iter().next()?;

    let editing = surface.is_editing();
    let (item, field) = bullet_item(surface, &InlineText::empty(), None, editing);
    surface.append_child(list, item);
    surface.set_focus(Some(field));
    Some(field)
}

/// Removes the bullet that owns `control`.
pub fn delete_bullet(surface: &mut Surface, control: NodeId) -> bool {
    match surface.closest_container(control, Container::Bullet) {
        Some(bullet) => {
            surface.remove(bullet);
            true
        }
        None => false,
    }
}
