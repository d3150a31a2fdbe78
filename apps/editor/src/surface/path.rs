//! Surface addresses: where an editable field or reorderable item came from
//! in the document at render time.
//!
//! Paths are recorded once, by the renderer or by a structural action, and
//! never rewritten afterwards. After reordering they describe *origin*, not
//! current position.

use std::fmt;

use crate::models::document::{HeaderField, RoleField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfacePath {
    Field(FieldPath),
    Item(ItemPath),
}

/// Address of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Header(HeaderField),
    SectionInline {
        section: usize,
    },
    GroupLabel {
        section: usize,
        group: usize,
    },
    GroupItems {
        section: usize,
        group: usize,
    },
    RoleField {
        section: usize,
        role: usize,
        field: RoleField,
    },
    BulletInline {
        section: usize,
        role: usize,
        bullet: usize,
    },
    ItemInline {
        section: usize,
        item: usize,
    },
}

/// Address of a reorderable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPath {
    Section { index: usize },
    Group { section: usize, index: usize },
    Role { section: usize, index: usize },
}

impl SurfacePath {
    /// The section index this path was rendered under, if any.
    pub fn section(&self) -> Option<usize> {
        match self {
            SurfacePath::Field(field) => field.section(),
            SurfacePath::Item(item) => Some(item.section()),
        }
    }
}

impl FieldPath {
    pub fn section(&self) -> Option<usize> {
        match *self {
            FieldPath::Header(_) => None,
            FieldPath::SectionInline { section }
            | FieldPath::GroupLabel { section, .. }
            | FieldPath::GroupItems { section, .. }
            | FieldPath::RoleField { section, .. }
            | FieldPath::BulletInline { section, .. }
            | FieldPath::ItemInline { section, .. } => Some(section),
        }
    }
}

impl ItemPath {
    pub fn section(&self) -> usize {
        match *self {
            ItemPath::Section { index } => index,
            ItemPath::Group { section, .. } | ItemPath::Role { section, .. } => section,
        }
    }
}

impl From<FieldPath> for SurfacePath {
    fn from(path: FieldPath) -> Self {
        SurfacePath::Field(path)
    }
}

impl From<ItemPath> for SurfacePath {
    fn from(path: ItemPath) -> Self {
        SurfacePath::Item(path)
    }
}

impl fmt::Display for SurfacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfacePath::Field(field) => field.fmt(f),
            SurfacePath::Item(item) => item.fmt(f),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FieldPath::Header(field) => write!(f, "header.{}", field.key()),
            FieldPath::SectionInline { section } => write!(f, "sections.{section}.inline"),
            FieldPath::GroupLabel { section, group } => {
                write!(f, "sections.{section}.groups.{group}.label")
            }
            FieldPath::GroupItems { section, group } => {
                write!(f, "sections.{section}.groups.{group}.items")
            }
            FieldPath::RoleField {
                section,
                role,
                field,
            } => write!(f, "sections.{section}.roles.{role}.{}", field.key()),
            FieldPath::BulletInline {
                section,
                role,
                bullet,
            } => write!(f, "sections.{section}.roles.{role}.bullets.{bullet}.inline"),
            FieldPath::ItemInline { section, item } => {
                write!(f, "sections.{section}.items.{item}.inline")
            }
        }
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ItemPath::Section { index } => write!(f, "sections.{index}"),
            ItemPath::Group { section, index } => write!(f, "sections.{section}.groups.{index}"),
            ItemPath::Role { section, index } => write!(f, "sections.{section}.roles.{index}"),
        }
    }
}
