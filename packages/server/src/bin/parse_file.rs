//! Batch runner for medicine files
//!
//! Reads a JSON array of `{"NM", "VPID"}` records, parses every name and
//! writes the results as pretty-printed JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use medicine_parser::{MedicineInput, ParsedMedicine};
use server_core::config::ParserConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "parse_file")]
#[command(about = "Parse a file of medicine product names")]
struct Cli {
    /// Input JSON file
    #[arg(long, default_value = "input_medicines.json")]
    input: PathBuf,

    /// Output JSON file (parent directories are created)
    #[arg(long, default_value = "output_medicines.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,medicine_parser=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let medicines = read_input(&cli.input)?;
    tracing::info!(count = medicines.len(), input = %cli.input.display(), "Loaded medicines");

    let config = ParserConfig::from_env().context("Failed to load configuration")?;
    let parser = config.build_parser();

    let parsed = parser
        .process_batch(&medicines)
        .await
        .context("Failed to process medicines")?;

    write_output(&cli.output, &parsed)?;

    tracing::info!(
        count = parsed.len(),
        output = %cli.output.display(),
        "Successfully processed medicines"
    );

    if let Some(first) = parsed.first() {
        tracing::info!("Sample output:\n{}", serde_json::to_string_pretty(first)?);
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<MedicineInput>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Input file '{}' not found", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON format in input file '{}'", path.display()))
}

fn write_output(path: &Path, parsed: &[ParsedMedicine]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(parsed)?;
    fs::write(path, json).with_context(|| format!("Failed to write '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medicine_parser::ExtractionResult;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("parse_file_test_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_read_input() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("input.json");
        fs::write(
            &path,
            r#"[{"NM": "Aspirin 75mg tablets", "VPID": "101"}, {"NM": "Fentanyl 12mcg patch", "VPID": "102"}]"#,
        )
        .unwrap();

        let medicines = read_input(&path).unwrap();
        assert_eq!(medicines.len(), 2);
        assert_eq!(medicines[1], MedicineInput::new("102", "Fentanyl 12mcg patch"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_input_errors() {
        let dir = scratch_dir();
        let missing = read_input(&dir.join("missing.json")).unwrap_err();
        assert!(missing.to_string().contains("not found"));

        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let bad = read_input(&path).unwrap_err();
        assert!(bad.to_string().contains("Invalid JSON"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_output_creates_directories() {
        let dir = scratch_dir();
        let path = dir.join("nested/out/output.json");
        let input = MedicineInput::new("101", "Aspirin 75mg tablets");
        let parsed = vec![ParsedMedicine::new(
            &input,
            ExtractionResult {
                name: "Aspirin".into(),
                strength: "75mg".into(),
                formulation: "tablets".into(),
                duration: None,
            },
        )];

        write_output(&path, &parsed).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written[0]["VPID"], "101");
        assert_eq!(written[0]["original_name"], "Aspirin 75mg tablets");
        assert!(written[0].get("duration").is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
