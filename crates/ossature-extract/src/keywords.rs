//! Keyword-anchored sentence extraction.

use std::collections::HashSet;

use ossature_core::{OutlineEntry, PageText};

use crate::config::Keyword;

/// Sentences captured per keyword, indexed in keyword order.
#[derive(Debug, Clone, Default)]
pub struct KeywordSentences {
    sentences: Vec<Vec<String>>,
}

impl KeywordSentences {
    fn new(keyword_count: usize) -> Self {
        Self {
            sentences: vec![Vec::new(); keyword_count],
        }
    }

    /// Sentences captured for the keyword at `index`, in document order.
    pub fn for_keyword(&self, index: usize) -> &[String] {
        self.sentences.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flatten into outline entries: all sentences of the first keyword,
    /// then all sentences of the second, and so on. The keyword itself is
    /// the entry's category.
    pub fn flatten(&self, keywords: &[Keyword]) -> Vec<OutlineEntry> {
        keywords
            .iter()
            .zip(&self.sentences)
            .flat_map(|(keyword, sentences)| {
                sentences
                    .iter()
                    .map(|sentence| OutlineEntry::new(keyword.word.clone(), sentence.clone()))
            })
            .collect()
    }
}

/// Scan page lines for sentences opened by a structural keyword.
///
/// A non-empty line whose lowercased text starts with a keyword (first
/// keyword in list order wins) and whose first character is uppercase opens
/// a sentence. Subsequent non-empty lines extend it unless they are known
/// footer lines, which are skipped without closing it. An empty line
/// following a non-empty one closes the sentence; further empty lines are
/// inert. The capture state carries across page boundaries.
pub fn scan_pages(
    pages: &[PageText],
    keywords: &[Keyword],
    footers: &HashSet<String>,
) -> KeywordSentences {
    let mut captured = KeywordSentences::new(keywords.len());
    let mut current: Option<usize> = None;
    let mut previous_line_empty = false;
    let mut previous_line_captured = false;

    let lowered: Vec<String> = keywords.iter().map(|k| k.word.to_lowercase()).collect();

    for page in pages {
        for line in &page.lines {
            let blank = line.trim().is_empty();

            if !blank {
                let opens = line.chars().next().is_some_and(char::is_uppercase).then(|| {
                    let line_lower = line.to_lowercase();
                    lowered.iter().position(|kw| line_lower.starts_with(kw.as_str()))
                });

                if let Some(Some(index)) = opens {
                    captured.sentences[index].push(line.trim().to_string());
                    current = Some(index);
                    previous_line_captured = true;
                } else if let Some(index) = current
                    && !footers.contains(line)
                {
                    if let Some(sentence) = captured.sentences[index].last_mut() {
                        sentence.push(' ');
                        sentence.push_str(line.trim());
                    }
                    previous_line_captured = true;
                }
            } else if previous_line_captured && !previous_line_empty {
                current = None;
                previous_line_captured = false;
            }

            previous_line_empty = blank;
        }
    }

    captured
}
