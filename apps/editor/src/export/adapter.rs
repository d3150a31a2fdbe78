//! Helpers for the downstream Word/PDF renderers, which re-read the exported
//! markdown line by line rather than the typed document.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::export::lines::LineKind;
use crate::models::inline::{Run, BOLD_MARKER};

/// Headings the renderers style as section headings.
pub const KNOWN_HEADINGS: [&str; 12] = [
    "PROFESSIONAL SUMMARY",
    "SUMMARY",
    "EDUCATION",
    "TECHNICAL SKILLS",
    "WORK EXPERIENCE",
    "PROFESSIONAL EXPERIENCE",
    "PROJECTS",
    "VOLUNTEERING",
    "ACHIEVEMENTS",
    "CERTIFICATIONS",
    "PUBLICATIONS",
    "SKILLS",
];

const FILENAME_PART_MAX: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// A markdown line classified for rendering. Bullet text has its marker
/// removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub kind: LineKind,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Cached patterns
// ────────────────────────────────────────────────────────────────────────────

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static TEMPLATE_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
static WRAPPED_BOLD: OnceLock<Regex> = OnceLock::new();
static TRAILING_PUNCT: OnceLock<Regex> = OnceLock::new();
static BULLET: OnceLock<Regex> = OnceLock::new();
static TITLE_DASH: OnceLock<Regex> = OnceLock::new();
static FILENAME_UNSAFE: OnceLock<Regex> = OnceLock::new();
static UNDERSCORES: OnceLock<Regex> = OnceLock::new();

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn template_placeholder() -> &'static Regex {
    TEMPLATE_PLACEHOLDER.get_or_init(|| Regex::new(r"<<[^>]+>>").unwrap())
}

fn wrapped_bold() -> &'static Regex {
    WRAPPED_BOLD.get_or_init(|| Regex::new(r"^\*\*(.+)\*\*$").unwrap())
}

fn trailing_punct() -> &'static Regex {
    TRAILING_PUNCT.get_or_init(|| Regex::new(r"[:%\-–—]+$").unwrap())
}

fn bullet() -> &'static Regex {
    BULLET.get_or_init(|| Regex::new(r"^[•●\-]\s*(.+)$").unwrap())
}

fn title_dash() -> &'static Regex {
    TITLE_DASH.get_or_init(|| Regex::new(r"\s*[-–—]\s*").unwrap())
}

fn filename_unsafe() -> &'static Regex {
    FILENAME_UNSAFE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|]"#).unwrap())
}

fn underscores() -> &'static Regex {
    UNDERSCORES.get_or_init(|| Regex::new(r"_+").unwrap())
}

// ────────────────────────────────────────────────────────────────────────────
// Line handling
// ────────────────────────────────────────────────────────────────────────────

/// Drops CR and zero-width spaces, maps NBSP and tabs to spaces, collapses
/// whitespace and trims.
pub fn normalize_line(line: &str) -> String {
    let cleaned: String = line
        .chars()
        .filter(|c| *c != '\r' && *c != '\u{200B}')
        .map(|c| if c == '\u{00A0}' || c == '\t' { ' ' } else { c })
        .collect();
    whitespace().replace_all(&cleaned, " ").trim().to_string()
}

/// Upper-cased heading key: surrounding `**` and trailing `:`, `%` and dashes
/// removed.
pub fn canonical_heading(line: &str) -> String {
    let unwrapped = wrapped_bold().replace(line, "$1");
    let trimmed = unwrapped.trim();
    let stripped = trailing_punct().replace(trimmed, "");
    normalize_line(&stripped).to_uppercase()
}

pub fn is_known_heading(key: &str) -> bool {
    KNOWN_HEADINGS.contains(&key)
}

pub fn is_role_line(line: &str) -> bool {
    line.contains('@') && line.contains('|') && line.contains('–')
}

/// Classifies one markdown line. Blank lines (after cleaning) are `None`.
pub fn classify_line(raw: &str) -> Option<ParsedLine> {
    let line = normalize_line(&template_placeholder().replace_all(raw, ""));
    if line.is_empty() {
        return None;
    }

    let heading = canonical_heading(&line);
    if is_known_heading(&heading) {
        return Some(ParsedLine {
            kind: LineKind::Heading,
            text: heading,
        });
    }
    if is_role_line(&line) {
        return Some(ParsedLine {
            kind: LineKind::RoleLine,
            text: line,
        });
    }
    if let Some(caps) = bullet().captures(&line) {
        return Some(ParsedLine {
            kind: LineKind::Bullet,
            text: caps[1].to_string(),
        });
    }
    Some(ParsedLine {
        kind: LineKind::Plain,
        text: line,
    })
}

pub fn classify_markdown(markdown: &str) -> Vec<ParsedLine> {
    markdown.split('\n').filter_map(classify_line).collect()
}

/// Splits on `**`; odd segments are bold. Text without any non-empty segment
/// comes back as one plain run.
pub fn parse_bold_segments(text: &str) -> Vec<Run> {
    let runs: Vec<Run> = text
        .split(BOLD_MARKER)
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| Run::new(part, i % 2 == 1))
        .collect();
    if runs.is_empty() {
        vec![Run::plain(text)]
    } else {
        runs
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File naming
// ────────────────────────────────────────────────────────────────────────────

/// First name and title from the first non-empty markdown line
/// (`"Ada Lovelace - Staff Engineer"`). Defaults: `User`, `Role`.
pub fn extract_name_and_title(markdown: &str) -> (String, String) {
    let first_line = markdown
        .split('\n')
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let mut parts = title_dash().split(first_line);
    let left = parts.next().unwrap_or_default().trim();
    let title = parts.next().unwrap_or_default().trim();

    let first_name = left.split_whitespace().next().unwrap_or("User");
    let title = if title.is_empty() { "Role" } else { title };
    (first_name.to_string(), title.to_string())
}

/// A filename-safe fragment: reserved characters removed, whitespace as
/// underscores, at most 60 characters.
pub fn safe_part(s: &str, fallback: &str) -> String {
    let cleaned = filename_unsafe().replace_all(s.trim(), "");
    let underscored = whitespace().replace_all(&cleaned, "_");
    let collapsed = underscores().replace_all(&underscored, "_");
    let part: String = collapsed
        .trim_matches('_')
        .chars()
        .take(FILENAME_PART_MAX)
        .collect();
    if part.is_empty() {
        fallback.to_string()
    } else {
        part
    }
}

/// `First_Title_Company.ext` for the exported file.
pub fn export_filename(markdown: &str, company: Option<&str>, format: ExportFormat) -> String {
    let (first_name, title) = extract_name_and_title(markdown);
    let company = company.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("companyname");
    format!(
        "{}_{}_{}.{}",
        safe_part(&first_name, "User"),
        safe_part(&title, "Role"),
        safe_part(company, "companyname"),
        format.extension()
    )
}
