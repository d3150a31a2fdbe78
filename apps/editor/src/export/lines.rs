//! Document → flattened export lines.
//!
//! The Word/PDF renderers consume an ordered list of typed lines. Bold runs
//! are carried inline as `**…**`, headings are upper-cased, role lines read
//! `**title** @ company | start – end` and bullets start with `- `.

use serde::{Deserialize, Serialize};

use crate::models::document::{Document, Role, Section, SectionBody};
use crate::models::inline::{InlineText, BOLD_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Heading,
    RoleLine,
    Bullet,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLine {
    pub kind: LineKind,
    pub text: String,
}

impl ExportLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Marker prefixed to bullet lines.
pub const BULLET_PREFIX: &str = "- ";

/// Renders `inline` with bold runs wrapped in `**`.
pub fn encode_inline(inline: &InlineText) -> String {
    inline
        .runs()
        .iter()
        .map(|run| {
            if run.bold {
                format!("{BOLD_MARKER}{}{BOLD_MARKER}", run.text)
            } else {
                run.text.clone()
            }
        })
        .collect()
}

/// The document as ordered, non-empty export lines.
pub fn flatten(document: &Document) -> Vec<ExportLine> {
    blocks(document).into_iter().flatten().collect()
}

/// The document as markdown: the export lines with a blank line after the
/// header and after every block.
pub fn to_markdown(document: &Document) -> String {
    let joined = blocks(document)
        .into_iter()
        .map(|line| line.map(|l| l.text).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n", collapse_blank_runs(&joined).trim())
}

/// Lines in document order; `None` is a block break.
fn blocks(document: &Document) -> Vec<Option<ExportLine>> {
    let mut out = Vec::new();
    let header = &document.header;

    let name_line = format!("{} - {}", header.name, header.title);
    if !header.name.is_empty() || !header.title.is_empty() {
        out.push(Some(ExportLine::new(LineKind::Plain, name_line.trim())));
    }
    let contact: Vec<&str> = [&header.phone, &header.email, &header.location]
        .into_iter()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    if !contact.is_empty() {
        out.push(Some(ExportLine::new(LineKind::Plain, contact.join(" | "))));
    }
    out.push(None);

    for section in &document.sections {
        section_blocks(section, &mut out);
    }
    out
}

fn section_blocks(section: &Section, out: &mut Vec<Option<ExportLine>>) {
    let heading = section.heading.trim().to_uppercase();
    if !heading.is_empty() {
        out.push(Some(ExportLine::new(LineKind::Heading, heading)));
        out.push(None);
    }

    match &section.body {
        SectionBody::Summary { inline } => {
            push_plain(out, encode_inline(inline));
            out.push(None);
        }
        SectionBody::Skills { groups } => {
            for group in groups {
                let items: Vec<&str> = group
                    .items
                    .iter()
                    .map(String::as_str)
                    .filter(|item| !item.is_empty())
                    .collect();
                push_plain(
                    out,
                    format!("{BOLD_MARKER}{}{BOLD_MARKER}: {}", group.label, items.join(", ")),
                );
            }
            out.push(None);
        }
        SectionBody::Experience { roles } => {
            for role in roles {
                out.push(Some(ExportLine::new(LineKind::RoleLine, role_line(role))));
                for bullet in &role.bullets {
                    let text = encode_inline(&bullet.inline);
                    out.push(Some(ExportLine::new(
                        LineKind::Bullet,
                        format!("{BULLET_PREFIX}{text}"),
                    )));
                }
                out.push(None);
            }
        }
        SectionBody::Education { items } | SectionBody::Generic { items } => {
            for item in items {
                push_plain(out, encode_inline(&item.inline));
            }
            out.push(None);
        }
    }
}

fn role_line(role: &Role) -> String {
    let title = if role.role_title.is_empty() {
        String::new()
    } else {
        format!("{BOLD_MARKER}{}{BOLD_MARKER}", role.role_title)
    };
    format!("{title} @ {} | {} – {}", role.company, role.start, role.end)
}

fn push_plain(out: &mut Vec<Option<ExportLine>>, text: String) {
    if !text.trim().is_empty() {
        out.push(Some(ExportLine::new(LineKind::Plain, text)));
    }
}

/// Collapses runs of three or more newlines into one blank line.
fn collapse_blank_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut newlines = 0;
    for c in s.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
