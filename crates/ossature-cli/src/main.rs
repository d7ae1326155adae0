use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod output;

use ossature_core::config_file::{self, ConfigFile};
use ossature_extract::{extract_outline, ExtractConfig};
use ossature_pdf::LopdfStyleBackend;
use ossature_pdf_mupdf::MupdfTextBackend;
use output::ColorMode;

/// Extract the structural outline of a PDF document as indexed JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the PDF file to process
    input: PathBuf,

    /// Path of the JSON file to write
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Path to a TOML config file (overrides the default config cascade)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        anyhow::bail!("input file not found: {}", cli.input.display());
    }

    let config_file = match &cli.config {
        Some(path) => config_file::load_from_path(path).ok_or_else(|| {
            anyhow::anyhow!("cannot read config file: {}", path.display())
        })?,
        None => config_file::load_config(),
    };
    let config = build_config(&config_file)?;

    let text_backend = MupdfTextBackend::new();
    let style_backend = LopdfStyleBackend::new();

    let outline = extract_outline(&cli.input, &text_backend, &style_backend, &config)?;

    let json = outline.to_json_pretty()?;
    std::fs::write(&cli.output, json)?;

    let color = ColorMode(!cli.no_color);
    let mut stdout = std::io::stdout();
    output::print_summary(
        &mut stdout,
        &outline,
        &cli.output.display().to_string(),
        color,
    )?;
    stdout.flush()?;

    Ok(())
}

fn build_config(file: &ConfigFile) -> anyhow::Result<ExtractConfig> {
    ExtractConfig::from_config_file(file).map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn output_defaults_to_output_json() {
        let cli = Cli::parse_from(["ossature", "input.pdf"]);
        assert_eq!(cli.output, PathBuf::from("output.json"));
        assert!(!cli.no_color);
        assert!(cli.config.is_none());
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "ossature",
            "doc.pdf",
            "-o",
            "out.json",
            "--config",
            "custom.toml",
            "--no-color",
        ]);
        assert_eq!(cli.input, PathBuf::from("doc.pdf"));
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.no_color);
    }

    #[test]
    fn config_file_translates_to_extract_config() {
        use ossature_core::config_file::ClassifierConfig;

        let file = ConfigFile {
            classifier: Some(ClassifierConfig {
                title_min_size: Some(20),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = build_config(&file).unwrap();
        assert_eq!(config.title_min_size, 20);
    }

    #[test]
    fn explicit_config_path_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[classifier]\nsection_min_size = 15\n").unwrap();

        let file = config_file::load_from_path(&path).unwrap();
        let config = build_config(&file).unwrap();
        assert_eq!(config.section_min_size, 15);
    }
}
