use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub classifier: Option<ClassifierConfig>,
    pub layout: Option<LayoutConfig>,
    /// Structural keywords in match-priority order. When present, this list
    /// replaces the built-in bilingual default set.
    pub keywords: Option<Vec<KeywordConfig>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub title_min_size: Option<i32>,
    pub title_min_x: Option<f32>,
    pub section_min_size: Option<i32>,
    pub paragraph_min_size: Option<i32>,
    /// Case-insensitive regex matched against font names to detect bold.
    pub bold_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fraction of page height from the bottom treated as the footer band.
    pub footer_band_ratio: Option<f32>,
}

/// One structural keyword with its locale tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub word: String,
    pub locale: Option<String>,
}

/// Platform config directory path: `<config_dir>/ossature/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ossature").join("config.toml"))
}

/// Load config by cascading CWD `.ossature.toml` over the platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".ossature.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        classifier: Some(ClassifierConfig {
            title_min_size: overlay
                .classifier
                .as_ref()
                .and_then(|c| c.title_min_size)
                .or_else(|| base.classifier.as_ref().and_then(|c| c.title_min_size)),
            title_min_x: overlay
                .classifier
                .as_ref()
                .and_then(|c| c.title_min_x)
                .or_else(|| base.classifier.as_ref().and_then(|c| c.title_min_x)),
            section_min_size: overlay
                .classifier
                .as_ref()
                .and_then(|c| c.section_min_size)
                .or_else(|| base.classifier.as_ref().and_then(|c| c.section_min_size)),
            paragraph_min_size: overlay
                .classifier
                .as_ref()
                .and_then(|c| c.paragraph_min_size)
                .or_else(|| base.classifier.as_ref().and_then(|c| c.paragraph_min_size)),
            bold_pattern: overlay
                .classifier
                .as_ref()
                .and_then(|c| c.bold_pattern.clone())
                .or_else(|| base.classifier.as_ref().and_then(|c| c.bold_pattern.clone())),
        }),
        layout: Some(LayoutConfig {
            footer_band_ratio: overlay
                .layout
                .as_ref()
                .and_then(|l| l.footer_band_ratio)
                .or_else(|| base.layout.as_ref().and_then(|l| l.footer_band_ratio)),
        }),
        keywords: overlay.keywords.or(base.keywords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_round_trips_through_toml() {
        let config = ConfigFile {
            classifier: Some(ClassifierConfig {
                title_min_size: Some(16),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.classifier.unwrap().title_min_size, Some(16));
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let toml_str = "[classifier]\ntitle_min_size = 15\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let classifier = parsed.classifier.unwrap();
        assert_eq!(classifier.title_min_size, Some(15));
        assert!(classifier.bold_pattern.is_none());
        assert!(parsed.keywords.is_none());
    }

    #[test]
    fn keywords_parse_with_locale_tags() {
        let toml_str = r#"
            [[keywords]]
            word = "Chapitre"
            locale = "fr"

            [[keywords]]
            word = "Chapter"
            locale = "en"
        "#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let keywords = parsed.keywords.unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].word, "Chapitre");
        assert_eq!(keywords[0].locale.as_deref(), Some("fr"));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            classifier: Some(ClassifierConfig {
                title_min_size: Some(14),
                section_min_size: Some(13),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            classifier: Some(ClassifierConfig {
                title_min_size: Some(18),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let classifier = merged.classifier.unwrap();
        assert_eq!(classifier.title_min_size, Some(18));
        assert_eq!(classifier.section_min_size, Some(13));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            layout: Some(LayoutConfig {
                footer_band_ratio: Some(0.05),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.layout.unwrap().footer_band_ratio, Some(0.05));
    }
}
