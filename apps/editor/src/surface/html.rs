//! HTML serialization of a surface, for hosts that mount the editable page
//! directly. Field paths are not emitted; nodes carry `data-node` ids so the
//! host can report events against them.

use crate::surface::{NodeId, NodeKind, Surface};

pub fn to_html(surface: &Surface) -> String {
    let mut out = String::new();
    write_node(surface, surface.root(), &mut out);
    out
}

fn write_node(surface: &Surface, id: NodeId, out: &mut String) {
    let Some(node) = surface.node(id) else {
        return;
    };
    let el = match &node.kind {
        NodeKind::Text(text) => {
            out.push_str(&escape_html(text));
            return;
        }
        NodeKind::Element(el) => el,
    };

    let tag = el.tag.name();
    out.push('<');
    out.push_str(tag);

    let mut class = el.class.to_string();
    if id == surface.root() && surface.is_editing() {
        class.push_str(" editing");
    }
    if !class.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape_html(class.trim())));
    }
    out.push_str(&format!(" data-node=\"{id}\""));
    if let Some(container) = el.container {
        out.push_str(&format!(" data-kind=\"{}\"", container.kind_name()));
    }
    if el.editable {
        out.push_str(" contenteditable=\"true\" spellcheck=\"true\"");
    }
    if let Some(scope) = el.handle {
        out.push_str(&format!(" data-drag-handle=\"{}\"", scope.name()));
    }
    if let Some(action) = el.action {
        out.push_str(&format!(" type=\"button\" data-action=\"{}\"", action.name()));
    }
    if !el.visible {
        out.push_str(" style=\"display:none\"");
    }
    out.push('>');

    for &child in surface.children(id) {
        write_node(surface, child, out);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
