use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, StyleBackend, TextBackend};

/// A text line annotated with the style attributes of its first character.
///
/// Precondition: style is assumed uniform within a line. Backends sample the
/// font name, size and position from the first character only, so a line
/// mixing styles is reported with the style of its opening character.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledLine {
    pub text: String,
    pub font_name: String,
    /// Font size in points, rounded up to the nearest integer.
    pub font_size: i32,
    /// X coordinate of the left edge of the line.
    pub x: f32,
}

impl StyledLine {
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_size: i32, x: f32) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            font_size,
            x,
        }
    }

    /// The (font, size, x) triple used to decide run membership.
    pub fn attributes(&self) -> (&str, i32, f32) {
        (&self.font_name, self.font_size, self.x)
    }
}

/// A maximal contiguous span of text sharing identical font name, size and
/// horizontal position. Immutable once emitted by the run concatenator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font_name: String,
    pub font_size: i32,
    pub x: f32,
}

/// Structural category assigned to a run by the typographic classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Title,
    Section,
    Paragraph,
    Footer,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::Section => "Section",
            Category::Paragraph => "Paragraph",
            Category::Footer => "Footer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block of text with its vertical position on the page, as reported by
/// the text backend. Used for footer detection.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Block text; lines are newline-separated and the block ends with a
    /// trailing newline, matching the backend's raw block output.
    pub text: String,
    /// Distance of the block's top edge from the top of the page.
    pub top: f32,
}

/// One page of plain extracted text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// Text lines in reading order. Blocks are separated by a single empty
    /// line so that downstream scanning can observe paragraph boundaries.
    pub lines: Vec<String>,
    /// Text blocks with their vertical positions.
    pub blocks: Vec<TextBlock>,
    /// Page height in the same units as [`TextBlock::top`].
    pub height: f32,
}

/// One entry of the final reconciled outline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutlineEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Text")]
    pub text: String,
}

impl OutlineEntry {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }
}

/// The ordered, de-duplicated outline produced by the reconciler.
///
/// Serialized as a string-keyed map whose keys are the zero-based entry
/// indices, preserving insertion order:
/// `{"0": {"Category": ..., "Text": ...}, "1": {...}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    pub fn new(entries: Vec<OutlineEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index-keyed view of the entries, in order.
    pub fn to_index_map(&self) -> IndexMap<String, &OutlineEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i.to_string(), entry))
            .collect()
    }

    /// Pretty-printed JSON (2-space indent), keys in entry order.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_index_map())
    }
}
