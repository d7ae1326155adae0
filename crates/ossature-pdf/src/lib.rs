//! Style-annotated line extraction backed by [`lopdf`].
//!
//! The text pipeline needs two views of a document: plain lines with block
//! positions, and lines annotated with font name, size and position. This
//! crate provides the second view by interpreting each page's content
//! stream directly.

use std::path::Path;

use ossature_core::{BackendError, StyleBackend, StyledLine};

pub mod source;
pub mod spans;

pub use source::{ContentSource, LopdfSource};
pub use spans::{extract_page_spans, group_spans_into_lines, TextSpan};

/// [`StyleBackend`] implementation that parses the document with `lopdf`
/// and interprets its content streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfStyleBackend;

impl LopdfStyleBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StyleBackend for LopdfStyleBackend {
    fn styled_lines(&self, path: &Path) -> Result<Vec<StyledLine>, BackendError> {
        let source = LopdfSource::open(path)?;
        styled_lines_from_source(&source)
    }
}

/// Extract style-annotated lines from every page of an already-open source,
/// in page order.
pub fn styled_lines_from_source(
    source: &dyn ContentSource,
) -> Result<Vec<StyledLine>, BackendError> {
    let pages = source.pages();
    let mut lines = Vec::new();

    for (&page_num, &page_id) in &pages {
        let spans = extract_page_spans(source, page_id)?;
        let page_lines = group_spans_into_lines(spans);
        tracing::trace!(page = page_num, lines = page_lines.len(), "styled page");
        lines.extend(page_lines);
    }

    Ok(lines)
}
