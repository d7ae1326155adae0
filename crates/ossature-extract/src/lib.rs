use std::path::Path;

use thiserror::Error;

pub mod classify;
pub mod config;
pub mod footer;
pub mod keywords;
pub mod reconcile;
pub mod runs;

pub use config::{ExtractConfig, Keyword};
pub use keywords::KeywordSentences;
// Re-export domain types from core (canonical definitions live there)
pub use ossature_core::{
    BackendError, Category, Outline, OutlineEntry, PageText, StyleBackend, StyledLine, TextBackend,
    TextBlock, TextRun,
};

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Extract the structural outline of a PDF document.
///
/// Pipeline:
/// 1. Load plain page text (lines, blocks, page height) via `text_backend`
/// 2. Collect footer blocks from the bottom band of each page
/// 3. Scan lines for sentences opened by a structural keyword
/// 4. Load style-annotated lines via `style_backend`
/// 5. Merge adjacent same-style lines into runs and classify each run
/// 6. Reconcile the keyword list with the typographic list
pub fn extract_outline(
    path: &Path,
    text_backend: &dyn TextBackend,
    style_backend: &dyn StyleBackend,
    config: &ExtractConfig,
) -> Result<Outline, OutlineError> {
    let pages = text_backend.load_pages(path)?;
    tracing::debug!(pages = pages.len(), "loaded page text");

    let footers = footer::collect_footers(&pages, config.footer_band_ratio);
    let sentences = keywords::scan_pages(&pages, &config.keywords, &footers);
    let keyword_entries = sentences.flatten(&config.keywords);
    tracing::debug!(
        footers = footers.len(),
        keyword_sentences = keyword_entries.len(),
        "keyword scan complete"
    );

    let styled = style_backend.styled_lines(path)?;
    let merged = runs::concat_runs(&styled, config.bold_regex());
    tracing::debug!(
        styled_lines = styled.len(),
        runs = merged.len(),
        "typographic run merge complete"
    );

    let typographic_entries: Vec<OutlineEntry> = merged
        .iter()
        .map(|run| {
            let category = classify::classify(config, &run.font_name, run.font_size, run.x);
            OutlineEntry::new(category.as_str(), run.text.clone())
        })
        .collect();

    let outline = reconcile::reconcile(keyword_entries, typographic_entries);
    tracing::info!(entries = outline.len(), "reconciled outline");
    Ok(outline)
}
