//! Footer detection from block positions.

use std::collections::HashSet;

use ossature_core::PageText;

/// Collect the text lines of every block whose top edge falls inside the
/// bottom band of its page. `band_ratio` is the fraction of the page height
/// that counts as the band, measured from the bottom edge.
///
/// Footer blocks are split into their individual lines so that membership
/// checks during line scanning work line by line; the trailing newline of
/// the raw block text is dropped.
pub fn collect_footers(pages: &[PageText], band_ratio: f32) -> HashSet<String> {
    let mut footers = HashSet::new();

    for page in pages {
        let threshold = (1.0 - band_ratio) * page.height;
        for block in &page.blocks {
            if block.top > threshold {
                let text = block.text.strip_suffix('\n').unwrap_or(&block.text);
                for line in text.split('\n') {
                    footers.insert(line.to_string());
                }
            }
        }
    }

    footers
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossature_core::TextBlock;

    fn page(blocks: Vec<(&str, f32)>, height: f32) -> PageText {
        PageText {
            lines: Vec::new(),
            blocks: blocks
                .into_iter()
                .map(|(text, top)| TextBlock {
                    text: text.to_string(),
                    top,
                })
                .collect(),
            height,
        }
    }

    #[test]
    fn block_in_bottom_band_is_a_footer() {
        let pages = vec![page(vec![("Page 3 of 12\n", 760.0)], 842.0)];
        let footers = collect_footers(&pages, 0.10);
        assert!(footers.contains("Page 3 of 12"));
    }

    #[test]
    fn block_above_band_is_not_a_footer() {
        let pages = vec![page(vec![("Chapter 1\n", 100.0)], 842.0)];
        let footers = collect_footers(&pages, 0.10);
        assert!(footers.is_empty());
    }

    #[test]
    fn block_exactly_on_threshold_is_not_a_footer() {
        // threshold = 0.9 * 842 = 757.8; comparison is strict
        let pages = vec![page(vec![("Edge case\n", 757.8)], 842.0)];
        let footers = collect_footers(&pages, 0.10);
        assert!(footers.is_empty());
    }

    #[test]
    fn multi_line_footer_block_yields_each_line() {
        let pages = vec![page(
            vec![("Official Journal\n2024 edition\n", 800.0)],
            842.0,
        )];
        let footers = collect_footers(&pages, 0.10);
        assert!(footers.contains("Official Journal"));
        assert!(footers.contains("2024 edition"));
    }

    #[test]
    fn footers_accumulate_across_pages() {
        let pages = vec![
            page(vec![("Page 1\n", 800.0)], 842.0),
            page(vec![("Page 2\n", 800.0)], 842.0),
        ];
        let footers = collect_footers(&pages, 0.10);
        assert!(footers.contains("Page 1"));
        assert!(footers.contains("Page 2"));
    }
}
