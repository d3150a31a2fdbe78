//! InlineText: the run-list representation of every rich-text field.
//!
//! A run is `{t, b}` on the wire. A normalized `InlineText` never holds two
//! adjacent runs with the same bold flag and never holds an empty run, except
//! the single `{"", false}` fallback that stands for an empty field.

use serde::{Deserialize, Serialize};

/// Literal emphasis delimiter that must never survive inside run text.
pub const BOLD_MARKER: &str = "**";

/// Characters that attach to the previous run without a synthesized space.
const CLOSING_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', ')'];

/// A single styled text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    #[serde(rename = "t", default)]
    pub text: String,
    #[serde(rename = "b", default)]
    pub bold: bool,
}

impl Run {
    pub fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// Normalized rich text. Every constructor (including deserialization) runs
/// the candidate runs through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Run>", into = "Vec<Run>")]
pub struct InlineText {
    runs: Vec<Run>,
}

impl InlineText {
    /// The empty-field fallback: one empty plain run.
    pub fn empty() -> Self {
        Self {
            runs: vec![Run::plain("")],
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        normalize(vec![Run::plain(text)])
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Concatenated text of all runs, bold or not.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when no run carries a non-whitespace character.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

impl Default for InlineText {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Run>> for InlineText {
    fn from(runs: Vec<Run>) -> Self {
        normalize(runs)
    }
}

impl From<InlineText> for Vec<Run> {
    fn from(inline: InlineText) -> Self {
        inline.runs
    }
}

/// Normalizes candidate runs into a valid [`InlineText`].
///
/// Steps, in order: strip `**`, NBSP → space, drop empty runs, synthesize a
/// space where a bold/plain boundary would otherwise fuse two words, merge
/// adjacent runs of equal weight, fall back to `[{"", false}]`.
///
/// Runs of equal weight are split text of one word sequence (a text leaf
/// split by the editing host), so they are joined verbatim.
pub fn normalize<I>(runs: I) -> InlineText
where
    I: IntoIterator<Item = Run>,
{
    // Joining `x*` with `*y` yields a fresh marker, so repeat until stable.
    let mut current: Vec<Run> = runs.into_iter().collect();
    loop {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        return InlineText::empty();
    }
    InlineText { runs: current }
}

fn normalize_pass(runs: &[Run]) -> Vec<Run> {
    let mut spaced: Vec<Run> = Vec::with_capacity(runs.len());

    for run in runs {
        let text = run.text.replace(BOLD_MARKER, "").replace('\u{00A0}', " ");
        if text.is_empty() {
            continue;
        }

        if let Some(prev) = spaced.last_mut() {
            if prev.bold != run.bold && needs_separator(&prev.text, &text) {
                prev.text.push(' ');
            }
        }
        spaced.push(Run::new(text, run.bold));
    }

    let mut merged: Vec<Run> = Vec::with_capacity(spaced.len());
    for run in spaced {
        match merged.last_mut() {
            Some(last) if last.bold == run.bold => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    merged
}

fn needs_separator(prev: &str, next: &str) -> bool {
    let prev_ends_space = prev.chars().last().is_some_and(char::is_whitespace);
    let next_first = next.chars().next();
    let next_starts_space = next_first.is_some_and(char::is_whitespace);
    let next_starts_punct = next_first.is_some_and(|c| CLOSING_PUNCTUATION.contains(&c));

    !prev_ends_space && !next_starts_space && !next_starts_punct
}
