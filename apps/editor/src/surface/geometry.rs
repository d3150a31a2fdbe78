//! Vertical geometry of surface elements.
//!
//! Drag reordering needs the on-screen bounds of the item under the pointer.
//! When a real host renders the surface it supplies its own [`Geometry`];
//! otherwise [`FlowLayout`] estimates the page by flowing blocks top to
//! bottom and word-wrapping inline content with static font-metric tables.
//!
//! Widths are in em units. The tables cover ASCII 0x20..=0x7E (95 printable
//! characters), index = `(char as usize) - 32`, and hold the Helvetica/Arial
//! advance widths the exported documents are set in. Non-ASCII falls back to
//! the table average.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::surface::{NodeId, NodeKind, Surface, Tag};

/// Vertical extent of a laid-out node, in pixels from the top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub height: f32,
}

impl Rect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Source of element bounds for the reorder engine.
pub trait Geometry: Send + Sync {
    /// Bounds of `node`, or `None` when it is not laid out (detached, removed).
    fn bounds(&self, surface: &Surface, node: NodeId) -> Option<Rect>;
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters of the editable page.
///
/// `text_width_em` is the usable text width at `font_size_px`.
/// A4 at 96dpi with 18mm side padding is ~658px, ≈ 50.6em at 13px.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub font_size_px: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub text_width_em: f32,
    /// Extra space after each section block.
    pub section_gap_px: f32,
}

impl PageConfig {
    pub fn line_height_px(&self) -> f32 {
        self.font_size_px * self.line_height
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            font_size_px: 13.0,
            line_height: 1.28,
            text_width_em: 50.6,
            section_gap_px: 8.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric tables
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Rendered width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

#[rustfmt::skip]
static ARIAL: FontMetricTable = FontMetricTable {
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A-Z
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500,
        0.667, 0.556, 0.833, 0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611,
        0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a-z
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222,
        0.500, 0.222, 0.833, 0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278,
        0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.52,
    space_width: 0.278,
};

#[rustfmt::skip]
static ARIAL_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A-Z
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556,
        0.722, 0.611, 0.833, 0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611,
        0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a-z
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278,
        0.556, 0.278, 0.889, 0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333,
        0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.56,
    space_width: 0.278,
};

/// Returns the metric table for the given weight.
pub fn metrics(bold: bool) -> &'static FontMetricTable {
    if bold {
        &ARIAL_BOLD
    } else {
        &ARIAL
    }
}

/// Greedy word-wrap of styled segments at `max_width_em`. Returns the line
/// count (0 for whitespace-only input).
///
/// A word split across segments is measured as two words; the error is one
/// space width at most.
pub fn estimated_lines(segments: &[(String, bool)], max_width_em: f32) -> u32 {
    let mut line_count = 0u32;
    let mut current_width = 0.0_f32;

    for (text, bold) in segments {
        let table = metrics(*bold);
        for word in text.split_whitespace() {
            let word_w = table.measure_str(word);
            if line_count == 0 {
                line_count = 1;
                current_width = word_w;
            } else if current_width + table.space_width + word_w > max_width_em {
                line_count += 1;
                current_width = word_w;
            } else {
                current_width += table.space_width + word_w;
            }
        }
    }
    line_count
}

// ────────────────────────────────────────────────────────────────────────────
// Flow layout
// ────────────────────────────────────────────────────────────────────────────

/// Estimated block-flow layout.
///
/// Blocks stack vertically. Consecutive inline children of a block share one
/// line box whose height is the wrapped line count times the line height.
/// Hidden elements take no space. An empty editable block still takes one
/// line so it stays a drop target.
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    config: PageConfig,
}

impl FlowLayout {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Lays out the whole surface.
    pub fn layout(&self, surface: &Surface) -> HashMap<NodeId, Rect> {
        let mut out = HashMap::new();
        self.place_block(surface, surface.root(), 0.0, &mut out);
        out
    }

    fn place_block(
        &self,
        surface: &Surface,
        id: NodeId,
        top: f32,
        out: &mut HashMap<NodeId, Rect>,
    ) -> f32 {
        let Some(element) = surface.element(id) else {
            return 0.0;
        };
        if !element.visible {
            self.collapse(surface, id, top, out);
            return 0.0;
        }

        let mut cursor = top;
        let mut line_box: Vec<NodeId> = Vec::new();
        for &child in surface.children(id) {
            let inline = surface.node(child).is_some_and(|n| n.is_inline());
            if inline {
                line_box.push(child);
            } else {
                cursor += self.place_line_box(surface, &line_box, cursor, out);
                line_box.clear();
                cursor += self.place_block(surface, child, cursor, out);
            }
        }
        cursor += self.place_line_box(surface, &line_box, cursor, out);

        let mut height = cursor - top;
        if height == 0.0 && element.editable {
            height = self.config.line_height_px();
        }
        if element.tag == Tag::Section {
            height += self.config.section_gap_px;
        }
        out.insert(id, Rect { top, height });
        height
    }

    fn place_line_box(
        &self,
        surface: &Surface,
        nodes: &[NodeId],
        top: f32,
        out: &mut HashMap<NodeId, Rect>,
    ) -> f32 {
        if nodes.is_empty() {
            return 0.0;
        }
        let mut segments = Vec::new();
        for &node in nodes {
            collect_segments(surface, node, false, &mut segments);
        }
        let lines = estimated_lines(&segments, self.config.text_width_em);
        let height = lines as f32 * self.config.line_height_px();

        for &node in nodes {
            let visible = surface.element(node).map_or(true, |el| el.visible);
            let rect = Rect {
                top,
                height: if visible { height } else { 0.0 },
            };
            out.insert(node, rect);
            for d in surface.descendants(node) {
                out.insert(d, rect);
            }
        }
        height
    }

    fn collapse(&self, surface: &Surface, id: NodeId, top: f32, out: &mut HashMap<NodeId, Rect>) {
        let rect = Rect { top, height: 0.0 };
        out.insert(id, rect);
        for d in surface.descendants(id) {
            out.insert(d, rect);
        }
    }
}

fn collect_segments(surface: &Surface, id: NodeId, bold: bool, out: &mut Vec<(String, bool)>) {
    let Some(node) = surface.node(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(text) => out.push((text.clone(), bold)),
        NodeKind::Element(el) if !el.visible => {}
        NodeKind::Element(el) => {
            let bold = bold || el.tag == Tag::Strong;
            for &child in surface.children(id) {
                collect_segments(surface, child, bold, out);
            }
        }
    }
}

impl Geometry for FlowLayout {
    fn bounds(&self, surface: &Surface, node: NodeId) -> Option<Rect> {
        if !surface.is_attached(node) {
            return None;
        }
        self.layout(surface).get(&node).copied()
    }
}
