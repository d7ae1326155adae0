use std::path::Path;

use mupdf::{Document, TextPageFlags};

use ossature_core::{BackendError, PageText, TextBackend, TextBlock};

/// MuPDF-based implementation of [`TextBackend`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-extraction code paths do not transitively
/// depend on it.
///
/// For each page it reports the text lines in reading order, the positioned
/// blocks used for footer detection, and the page height. A single empty
/// line is appended after each block so that downstream scanning can observe
/// paragraph boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfTextBackend;

impl MupdfTextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for MupdfTextBackend {
    fn load_pages(&self, path: &Path) -> Result<Vec<PageText>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::Extract(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::Extract(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::Extract(e.to_string()))?;

            let bounds = page
                .bounds()
                .map_err(|e| BackendError::Extract(e.to_string()))?;
            let height = bounds.y1 - bounds.y0;

            let mut lines = Vec::new();
            let mut blocks = Vec::new();

            for block in text_page.blocks() {
                let block_bounds = block.bounds();
                let top = block_bounds.y0 - bounds.y0;

                let mut block_text = String::new();
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    block_text.push_str(&line_text);
                    block_text.push('\n');
                    lines.push(line_text);
                }

                // Blank line marks the block boundary for the line scanner.
                lines.push(String::new());
                blocks.push(TextBlock {
                    text: block_text,
                    top,
                });
            }

            pages.push(PageText {
                lines,
                blocks,
                height,
            });
        }

        Ok(pages)
    }
}
