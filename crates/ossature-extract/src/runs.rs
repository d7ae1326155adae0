//! Merging of adjacent same-style lines into text runs.

use ossature_core::{StyledLine, TextRun};
use regex::Regex;

/// Merge adjacent [`StyledLine`]s that share the same (font, size, x)
/// attributes into maximal [`TextRun`]s.
///
/// Lines are joined with a single space and each finished run is trimmed.
/// Within a run, a bold line starting with an uppercase letter restarts the
/// run: headings set in the same style back to back would otherwise fuse
/// into one run, so the accumulated text is discarded and the run begins
/// again at that line.
pub fn concat_runs(lines: &[StyledLine], bold_re: &Regex) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut buffer = String::new();
    let mut prev: Option<(String, i32, f32)> = None;

    for line in lines {
        let same_attrs = prev
            .as_ref()
            .is_some_and(|(font, size, x)| {
                line.font_name == *font && line.font_size == *size && line.x == *x
            });

        if same_attrs {
            let restarts = line.text.chars().next().is_some_and(char::is_uppercase)
                && bold_re.is_match(&line.font_name);
            if restarts {
                buffer.clear();
                buffer.push_str(&line.text);
            } else {
                buffer.push(' ');
                buffer.push_str(&line.text);
            }
        } else {
            if let Some((font, size, x)) = prev.take()
                && !buffer.is_empty()
            {
                runs.push(TextRun {
                    text: buffer.trim().to_string(),
                    font_name: font,
                    font_size: size,
                    x,
                });
            }
            buffer.clear();
            buffer.push_str(&line.text);
            prev = Some((line.font_name.clone(), line.font_size, line.x));
        }
    }

    if let Some((font, size, x)) = prev
        && !buffer.is_empty()
    {
        runs.push(TextRun {
            text: buffer.trim().to_string(),
            font_name: font,
            font_size: size,
            x,
        });
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)Bold").unwrap());

    fn line(text: &str, font: &str, size: i32, x: f32) -> StyledLine {
        StyledLine::new(text, font, size, x)
    }

    #[test]
    fn empty_input_yields_no_runs() {
        assert!(concat_runs(&[], &BOLD_RE).is_empty());
    }

    #[test]
    fn single_line_becomes_single_run() {
        let runs = concat_runs(&[line("Chapter 1", "Helvetica-Bold", 16, 72.0)], &BOLD_RE);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Chapter 1");
        assert_eq!(runs[0].font_name, "Helvetica-Bold");
        assert_eq!(runs[0].font_size, 16);
    }

    #[test]
    fn same_attributes_merge_with_space() {
        let runs = concat_runs(
            &[
                line("This act applies", "Helvetica", 11, 72.0),
                line("to all persons.", "Helvetica", 11, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "This act applies to all persons.");
    }

    #[test]
    fn attribute_change_splits_runs() {
        let runs = concat_runs(
            &[
                line("Chapter 1", "Helvetica-Bold", 16, 72.0),
                line("Body text here", "Helvetica", 11, 72.0),
                line("and more body.", "Helvetica", 11, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Chapter 1");
        assert_eq!(runs[1].text, "Body text here and more body.");
        // The run carries the attributes it was accumulated under.
        assert_eq!(runs[0].font_name, "Helvetica-Bold");
        assert_eq!(runs[1].font_name, "Helvetica");
    }

    #[test]
    fn size_change_alone_splits_runs() {
        let runs = concat_runs(
            &[
                line("Big", "Helvetica", 16, 72.0),
                line("small", "Helvetica", 11, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn uppercase_bold_line_restarts_run() {
        // Two bold headings in identical style: the second discards the
        // first from the buffer instead of fusing with it.
        let runs = concat_runs(
            &[
                line("Chapter 1", "Helvetica-Bold", 16, 72.0),
                line("Chapter 2", "Helvetica-Bold", 16, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Chapter 2");
    }

    #[test]
    fn lowercase_bold_continuation_still_merges() {
        let runs = concat_runs(
            &[
                line("Chapter 1: general", "Helvetica-Bold", 16, 72.0),
                line("provisions", "Helvetica-Bold", 16, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Chapter 1: general provisions");
    }

    #[test]
    fn uppercase_non_bold_continuation_merges() {
        let runs = concat_runs(
            &[
                line("The Minister shall", "Helvetica", 11, 72.0),
                line("Act accordingly.", "Helvetica", 11, 72.0),
            ],
            &BOLD_RE,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "The Minister shall Act accordingly.");
    }

    #[test]
    fn run_text_is_trimmed() {
        let runs = concat_runs(&[line("  padded  ", "Helvetica", 11, 72.0)], &BOLD_RE);
        assert_eq!(runs[0].text, "padded");
    }

    #[test]
    fn merging_already_merged_runs_is_stable() {
        let input = vec![
            line("Chapter 1", "Helvetica-Bold", 16, 72.0),
            line("Body text", "Helvetica", 11, 72.0),
            line("continues.", "Helvetica", 11, 72.0),
        ];
        let once = concat_runs(&input, &BOLD_RE);
        let again: Vec<StyledLine> = once
            .iter()
            .map(|r| StyledLine::new(r.text.clone(), r.font_name.clone(), r.font_size, r.x))
            .collect();
        let twice = concat_runs(&again, &BOLD_RE);
        assert_eq!(once, twice);
    }
}
