//! The editable surface: an arena-backed element tree derived from a
//! [`Document`](crate::models::Document).
//!
//! The surface is disposable. It is rebuilt wholesale by every render, mutated
//! live by editing, drag reordering and structural actions, and read back by
//! the reconciler on save. Node identities are never reused within one
//! surface, so a stale `NodeId` simply stops resolving.
//!
//! Field addresses are kept in a side map (`NodeId → SurfacePath`), not on the
//! elements themselves.

pub mod geometry;
pub mod html;
pub mod path;

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::editor::session::EditMode;
use crate::models::document::SectionKind;
use crate::models::inline::Run;

pub use path::{FieldPath, ItemPath, SurfacePath};

// ────────────────────────────────────────────────────────────────────────────
// Node types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Span,
    Strong,
    Heading,
    Section,
    List,
    ListItem,
    Button,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Strong => "strong",
            Tag::Heading => "h1",
            Tag::Section => "section",
            Tag::List => "ul",
            Tag::ListItem => "li",
            Tag::Button => "button",
        }
    }

    /// Inline elements flow inside their parent's line box.
    pub fn is_inline(self) -> bool {
        matches!(self, Tag::Span | Tag::Strong | Tag::Button)
    }
}

/// Structural role of an element, used by the reorder engine and reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Sections,
    Section(SectionKind),
    Roles,
    Role,
    SkillGroup,
    Bullets,
    Bullet,
}

impl Container {
    pub fn kind_name(self) -> &'static str {
        match self {
            Container::Sections => "sections",
            Container::Section(_) => "section",
            Container::Roles => "roles",
            Container::Role => "role",
            Container::SkillGroup => "group",
            Container::Bullets => "bullets",
            Container::Bullet => "bullet",
        }
    }
}

/// A reorder scope. Drag handles name the scope of the container they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragScope {
    Section,
    Role,
}

impl DragScope {
    pub fn name(self) -> &'static str {
        match self {
            DragScope::Section => "section",
            DragScope::Role => "role",
        }
    }

    /// Whether `container` is a reorderable item of this scope.
    pub fn matches(self, container: Container) -> bool {
        match self {
            DragScope::Section => matches!(container, Container::Section(_)),
            DragScope::Role => container == Container::Role,
        }
    }
}

/// Clickable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Edit,
    Save,
    Cancel,
    AddRole,
    DeleteRole,
    AddBullet,
    DeleteBullet,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Edit => "edit",
            Action::Save => "save",
            Action::Cancel => "cancel",
            Action::AddRole => "add-role",
            Action::DeleteRole => "del-role",
            Action::AddBullet => "add-bullet",
            Action::DeleteBullet => "del-bullet",
        }
    }

    pub fn is_structural(self) -> bool {
        !matches!(self, Action::Edit | Action::Save | Action::Cancel)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub class: &'static str,
    pub container: Option<Container>,
    pub editable: bool,
    /// Reads back as InlineText rather than plain text.
    pub rich: bool,
    pub handle: Option<DragScope>,
    pub action: Option<Action>,
    pub visible: bool,
}

impl Element {
    pub fn new(tag: Tag, class: &'static str) -> Self {
        Self {
            tag,
            class,
            container: None,
            editable: false,
            rich: false,
            handle: None,
            action: None,
            visible: true,
        }
    }

    pub fn container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn rich(mut self) -> Self {
        self.rich = true;
        self
    }

    pub fn handle(mut self, scope: DragScope) -> Self {
        self.handle = Some(scope);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        match &self.kind {
            NodeKind::Element(el) => el.tag.is_inline(),
            NodeKind::Text(_) => true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Surface
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Surface {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    mode: EditMode,
    paths: HashMap<NodeId, SurfacePath>,
    focus: Option<NodeId>,
}

impl Surface {
    pub fn new(mode: EditMode) -> Self {
        let mut surface = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            mode,
            paths: HashMap::new(),
            focus: None,
        };
        surface.root = surface.create_element(Element::new(Tag::Div, "paperWrap"));
        surface
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::element)
    }

    pub fn container(&self, id: NodeId) -> Option<Container> {
        self.element(id).and_then(|el| el.container)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` is attached under the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.closest(id, |_, node_id| node_id == self.root).is_some()
    }

    // ── construction ────────────────────────────────────────────────────────

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.alloc(NodeKind::Element(element))
    }

    /// Creates a detached text leaf.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create_element(element);
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    // ── tree mutation ───────────────────────────────────────────────────────

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` before `reference` (or last when
    /// `reference` is `None` or not a child of `parent`). An attached child
    /// is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        // Refuse to create a cycle.
        if self.closest(parent, |_, id| id == child).is_some() {
            return false;
        }

        self.detach(child);

        let Some(parent_node) = self.node_mut(parent) else {
            return false;
        };
        let position = reference
            .and_then(|r| parent_node.children.iter().position(|c| *c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(position, child);

        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
        }
        true
    }

    /// Moves `item` to sit immediately before `target` under `target`'s parent.
    pub fn move_before(&mut self, item: NodeId, target: NodeId) -> bool {
        if item == target {
            return false;
        }
        match self.parent(target) {
            Some(parent) => self.insert_before(parent, item, Some(target)),
            None => false,
        }
    }

    /// Moves `item` to sit immediately after `target` under `target`'s parent.
    pub fn move_after(&mut self, item: NodeId, target: NodeId) -> bool {
        if item == target {
            return false;
        }
        let Some(parent) = self.parent(target) else {
            return false;
        };
        // Resolve the successor after detaching, since `item` may be it.
        self.detach(item);
        let next = self.next_sibling(target);
        self.insert_before(parent, item, next)
    }

    /// Unlinks `id` from its parent, keeping the subtree alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Removes `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);

        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));
        for node_id in doomed {
            self.paths.remove(&node_id);
            if self.focus == Some(node_id) {
                self.focus = None;
            }
            if let Some(slot) = self.nodes.get_mut(node_id.0) {
                *slot = None;
            }
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    // ── traversal ───────────────────────────────────────────────────────────

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Nearest inclusive ancestor satisfying `pred`.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Node, NodeId) -> bool,
    {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if pred(node, node_id) {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Nearest inclusive ancestor with the given container role.
    pub fn closest_container(&self, id: NodeId, container: Container) -> Option<NodeId> {
        self.closest(id, |node, _| {
            node.element().and_then(|el| el.container) == Some(container)
        })
    }

    /// Nearest inclusive ancestor that is a section container of any kind.
    pub fn closest_section(&self, id: NodeId) -> Option<NodeId> {
        self.closest(id, |node, _| {
            matches!(
                node.element().and_then(|el| el.container),
                Some(Container::Section(_))
            )
        })
    }

    /// Descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Descendants of `id` with the given container role, in document order.
    pub fn descendants_with(&self, id: NodeId, container: Container) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|d| self.container(*d) == Some(container))
            .collect()
    }

    /// Concatenated text of every text leaf under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text(text)) = self.node(id).map(|n| &n.kind) {
            out.push_str(text);
        }
        for d in self.descendants(id) {
            if let Some(NodeKind::Text(text)) = self.node(d).map(|n| &n.kind) {
                out.push_str(text);
            }
        }
        out
    }

    // ── content editing ─────────────────────────────────────────────────────

    /// Replaces the content of `id` with a single text leaf (none when empty).
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            self.append_text(id, text);
        }
    }

    /// Replaces the content of `id` with plain text leaves and bold wrappers,
    /// one per run. This is how pasted rich content lands on the surface.
    pub fn set_rich_content(&mut self, id: NodeId, runs: &[Run]) {
        self.clear_children(id);
        for run in runs.iter().filter(|r| !r.text.is_empty()) {
            if run.bold {
                let strong = self.append_element(id, Element::new(Tag::Strong, ""));
                self.append_text(strong, run.text.as_str());
            } else {
                self.append_text(id, run.text.as_str());
            }
        }
    }

    /// Wraps the byte range `range` of text leaf `text_node` in a bold
    /// wrapper, splitting the leaf as needed. Returns the wrapper.
    pub fn embolden(&mut self, text_node: NodeId, range: Range<usize>) -> Option<NodeId> {
        let NodeKind::Text(text) = &self.node(text_node)?.kind else {
            return None;
        };
        if range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return None;
        }
        let before = text[..range.start].to_string();
        let middle = text[range.clone()].to_string();
        let after = text[range.end..].to_string();
        let parent = self.parent(text_node)?;

        let strong = self.create_element(Element::new(Tag::Strong, ""));
        self.append_text(strong, middle);
        self.insert_before(parent, strong, Some(text_node));
        if !before.is_empty() {
            let lead = self.create_text(before);
            self.insert_before(parent, lead, Some(strong));
        }
        if !after.is_empty() {
            let tail = self.create_text(after);
            let next = self.next_sibling(text_node);
            self.insert_before(parent, tail, next);
        }
        self.remove(text_node);
        Some(strong)
    }

    // ── addressing & focus ──────────────────────────────────────────────────

    pub fn set_path(&mut self, id: NodeId, path: SurfacePath) {
        self.paths.insert(id, path);
    }

    pub fn path_of(&self, id: NodeId) -> Option<&SurfacePath> {
        self.paths.get(&id)
    }

    /// First attached node (in document order) carrying `path`.
    pub fn find_by_path(&self, path: &SurfacePath) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.paths.get(id) == Some(path))
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    pub fn set_focus(&mut self, id: Option<NodeId>) {
        self.focus = id.filter(|id| self.contains(*id));
    }
}
