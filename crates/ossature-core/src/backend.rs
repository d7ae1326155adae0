use std::path::Path;

use thiserror::Error;

use crate::{PageText, StyledLine};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extract(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for backends that extract plain page text.
///
/// Implementors yield, per page, the text lines in reading order together
/// with the positioned blocks and the page height needed for footer
/// detection. The scanning pipeline lives in `ossature-extract`.
pub trait TextBackend: Send + Sync {
    /// Extract every page of the document, in page order.
    fn load_pages(&self, path: &Path) -> Result<Vec<PageText>, BackendError>;
}

/// Trait for backends that extract style-annotated text lines.
///
/// Implementors yield one [`StyledLine`] per text line, flattened across
/// all pages in page order, with style attributes sampled from the line's
/// first character.
pub trait StyleBackend: Send + Sync {
    fn styled_lines(&self, path: &Path) -> Result<Vec<StyledLine>, BackendError>;
}
