//! Intake of documents produced by the generation service.
//!
//! Validation is deliberately minimal (header object, sections array); every
//! other shape problem degrades to empty values. The accepted document is then
//! sanitized: stray `**` markers and surrounding whitespace are removed from
//! plain fields, headings are upper-cased, rich text is normalized.

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::EditorError;
use crate::models::document::{
    Document, Header, HeaderField, InlineItem, Role, RoleField, Section, SectionBody, SectionKind,
    SkillGroup,
};
use crate::models::inline::{normalize, InlineText, Run, BOLD_MARKER};

/// Parses raw model output. Anything that is not JSON is an invalid document.
pub fn parse_document_str(raw: &str) -> Result<Document, EditorError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| EditorError::InvalidDocument(format!("not valid JSON: {e}")))?;
    parse_document(&value)
}

/// Validates and sanitizes a generated document.
pub fn parse_document(value: &Value) -> Result<Document, EditorError> {
    let root = value
        .as_object()
        .ok_or_else(|| EditorError::InvalidDocument("document must be an object".to_string()))?;
    let header = root
        .get("header")
        .and_then(Value::as_object)
        .ok_or_else(|| EditorError::InvalidDocument("header must be an object".to_string()))?;
    let sections = root
        .get("sections")
        .and_then(Value::as_array)
        .ok_or_else(|| EditorError::InvalidDocument("sections must be an array".to_string()))?;

    let mut doc_header = Header::default();
    for field in HeaderField::ALL {
        doc_header.set(field, plain_field(header, field.key()));
    }

    let sections = sections
        .iter()
        .filter_map(Value::as_object)
        .map(parse_section)
        .collect();

    Ok(Document {
        header: doc_header,
        sections,
    })
}

/// Removes `**` markers and trims.
pub fn strip_markers(s: &str) -> String {
    s.replace(BOLD_MARKER, "").trim().to_string()
}

fn parse_section(obj: &Map<String, Value>) -> Section {
    let heading = str_of(obj.get("heading")).to_uppercase().trim().to_string();
    let tag = str_of(obj.get("type"));
    let kind = SectionKind::from_tag(tag).unwrap_or_else(|| {
        debug!(section_type = tag, "Unknown section type, treating as generic");
        SectionKind::Generic
    });

    let body = match kind {
        SectionKind::Summary => SectionBody::Summary {
            inline: inline_of(obj.get("inline")),
        },
        SectionKind::Skills => SectionBody::Skills {
            groups: array_of(obj.get("groups"))
                .filter_map(Value::as_object)
                .map(|g| SkillGroup {
                    label: plain_field(g, "label"),
                    items: array_of(g.get("items"))
                        .map(|item| strip_markers(str_of(Some(item))))
                        .collect(),
                })
                .collect(),
        },
        SectionKind::Experience => SectionBody::Experience {
            roles: array_of(obj.get("roles"))
                .filter_map(Value::as_object)
                .map(parse_role)
                .collect(),
        },
        SectionKind::Education => SectionBody::Education {
            items: items_of(obj.get("items")),
        },
        SectionKind::Generic => SectionBody::Generic {
            items: items_of(obj.get("items")),
        },
    };

    Section { heading, body }
}

fn parse_role(obj: &Map<String, Value>) -> Role {
    let mut role = Role::default();
    for field in RoleField::ALL {
        role.set(field, plain_field(obj, field.key()));
    }
    role.bullets = items_of(obj.get("bullets"));
    role
}

fn items_of(value: Option<&Value>) -> Vec<InlineItem> {
    array_of(value)
        .map(|item| InlineItem::new(inline_of(item.get("inline"))))
        .collect()
}

fn inline_of(value: Option<&Value>) -> InlineText {
    let runs = array_of(value).map(|seg| {
        let text = str_of(seg.get("t"));
        let bold = seg.get("b").and_then(Value::as_bool).unwrap_or(false);
        Run::new(text, bold)
    });
    normalize(runs)
}

fn plain_field(obj: &Map<String, Value>, key: &str) -> String {
    strip_markers(str_of(obj.get(key)))
}

fn str_of(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

fn array_of(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}
