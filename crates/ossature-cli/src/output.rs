use std::io::Write;

use ossature_core::Outline;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extraction summary: entry count, per-category breakdown, and
/// where the JSON landed.
pub fn print_summary(
    w: &mut dyn Write,
    outline: &Outline,
    output_path: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let heading = format!("Extracted {} outline entries", outline.len());
    if color.enabled() {
        writeln!(w, "{}", heading.green().bold())?;
    } else {
        writeln!(w, "{heading}")?;
    }

    for (category, count) in category_counts(outline) {
        writeln!(w, "  {category}: {count}")?;
    }

    writeln!(w, "Wrote {output_path}")?;
    Ok(())
}

/// Per-category entry counts, in first-appearance order.
fn category_counts(outline: &Outline) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in &outline.entries {
        match counts.iter_mut().find(|(c, _)| *c == entry.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((entry.category.clone(), 1)),
        }
    }
    counts
}
