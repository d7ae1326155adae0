//! Typographic classification of text runs.

use ossature_core::Category;

use crate::ExtractConfig;

/// Classify a run by its style attributes.
///
/// Rules are checked in order; the first match wins:
/// bold and (large or indented) is a Title, bold and medium is a Section,
/// anything above the paragraph threshold is a Paragraph, the rest is
/// Footer material. All size comparisons are strict.
pub fn classify(config: &ExtractConfig, font_name: &str, font_size: i32, x: f32) -> Category {
    let bold = config.bold_regex().is_match(font_name);

    if bold && (font_size > config.title_min_size || x > config.title_min_x) {
        Category::Title
    } else if bold && font_size > config.section_min_size {
        Category::Section
    } else if font_size > config.paragraph_min_size {
        Category::Paragraph
    } else {
        Category::Footer
    }
}
