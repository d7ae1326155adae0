use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use ossature_core::config_file::ConfigFile;

use crate::OutlineError;

/// One structural keyword with its locale tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub word: String,
    pub locale: Option<String>,
}

impl Keyword {
    pub fn new(word: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            locale: Some(locale.into()),
        }
    }
}

static DEFAULT_BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)Bold").unwrap());

/// The built-in bilingual keyword set, in match-priority order.
fn default_keywords() -> Vec<Keyword> {
    [
        ("Titre", "fr"),
        ("Title", "en"),
        ("Chapitre", "fr"),
        ("Chapter", "en"),
        ("Section", "en"),
        ("Sous-section", "fr"),
        ("Sub-section", "en"),
        ("Paragraphe", "fr"),
        ("Paragraph", "en"),
        ("Article", "en"),
        ("Livre", "fr"),
        ("Book", "en"),
    ]
    .into_iter()
    .map(|(word, locale)| Keyword::new(word, locale))
    .collect()
}

/// Configuration for the outline extraction pipeline.
///
/// Thresholds were tuned empirically against the document templates the
/// pipeline was built for; expose them here so other templates can reuse
/// the pipeline without code changes.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Structural keywords in match-priority order (first match wins).
    pub keywords: Vec<Keyword>,
    /// A bold run larger than this (or indented past `title_min_x`) is a Title.
    pub title_min_size: i32,
    pub title_min_x: f32,
    /// A bold run larger than this is a Section.
    pub section_min_size: i32,
    /// A run larger than this is a Paragraph; anything smaller is a Footer.
    pub paragraph_min_size: i32,
    /// Fraction of page height from the bottom treated as the footer band.
    pub footer_band_ratio: f32,
    bold_re: Regex,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            title_min_size: 14,
            title_min_x: 100.0,
            section_min_size: 13,
            paragraph_min_size: 8,
            footer_band_ratio: 0.10,
            bold_re: DEFAULT_BOLD_RE.clone(),
        }
    }
}

impl ExtractConfig {
    /// The compiled bold-font pattern.
    pub fn bold_regex(&self) -> &Regex {
        &self.bold_re
    }

    /// Replace the keyword list.
    pub fn with_keywords(mut self, keywords: Vec<Keyword>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Replace the bold-font pattern (compiled case-insensitively).
    pub fn with_bold_pattern(mut self, pattern: &str) -> Result<Self, OutlineError> {
        self.bold_re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| OutlineError::Config(format!("bad bold pattern {pattern:?}: {e}")))?;
        Ok(self)
    }

    /// Build a config from an on-disk [`ConfigFile`], falling back to
    /// defaults for any field the file leaves unset.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, OutlineError> {
        let mut config = ExtractConfig::default();

        if let Some(classifier) = &file.classifier {
            if let Some(v) = classifier.title_min_size {
                config.title_min_size = v;
            }
            if let Some(v) = classifier.title_min_x {
                config.title_min_x = v;
            }
            if let Some(v) = classifier.section_min_size {
                config.section_min_size = v;
            }
            if let Some(v) = classifier.paragraph_min_size {
                config.paragraph_min_size = v;
            }
            if let Some(pattern) = &classifier.bold_pattern {
                config = config.with_bold_pattern(pattern)?;
            }
        }

        if let Some(layout) = &file.layout
            && let Some(ratio) = layout.footer_band_ratio
        {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(OutlineError::Config(format!(
                    "footer_band_ratio must be in 0.0..=1.0, got {ratio}"
                )));
            }
            config.footer_band_ratio = ratio;
        }

        if let Some(keywords) = &file.keywords {
            config.keywords = keywords
                .iter()
                .map(|k| Keyword {
                    word: k.word.clone(),
                    locale: k.locale.clone(),
                })
                .collect();
        }

        Ok(config)
    }
}
