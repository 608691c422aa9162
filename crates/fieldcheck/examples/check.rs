//! Example: check an input CSV or workbook before ingest.
//!
//! Usage:
//!   cargo run --example check -- <config.json|config.toml> [field_definitions.json]
//!
//! Set `RUST_LOG=fieldcheck=debug` for detailed logging.

use std::env;

use fieldcheck::{
    csv_from_excel, preprocess_csv, Config, FieldDefinitions, MediaTypeConfig, Severity,
    ValidationEngine,
};
use tracing_subscriber::EnvFilter;

fn main() -> fieldcheck::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --example check -- <config> [field_definitions.json]");
        std::process::exit(1);
    }

    let config = Config::from_path(&args[1])?;
    let fields: FieldDefinitions = match args.get(2) {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| fieldcheck::FieldcheckError::Io { path: path.into(), source: e })?;
            serde_json::from_str(&contents)?
        }
        None => FieldDefinitions::new(),
    };

    if config.is_excel_input() {
        let summary = csv_from_excel(&config)?;
        println!(
            "Extracted {} rows to {}",
            summary.rows_written,
            summary.output.display()
        );
    }

    let preprocessed = preprocess_csv(&config)?;
    println!("Input: {}", preprocessed.source.file);
    println!("  Hash: {}", preprocessed.source.hash);
    println!(
        "  Rows: {} ({} commented out)",
        preprocessed.table.row_count(),
        preprocessed.skipped_rows
    );

    let media_types = MediaTypeConfig::from_config(&config)?;
    if let Some(files) = preprocessed.table.column_by_name("file") {
        for file in files.into_iter().filter(|f| !f.is_empty()) {
            println!("  {file}: {}", media_types.resolve(file));
        }
    }

    let observations = ValidationEngine::new().validate(&preprocessed.table, &fields, &config);
    if observations.is_empty() {
        println!("\nNo problems found.");
        return Ok(());
    }

    println!("\nObservations ({}):", observations.len());
    for obs in &observations {
        let icon = match obs.severity {
            Severity::Error => "✗",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        };
        println!(
            "  {} [{}] row {}, {}: {}",
            icon,
            obs.observation_type.label(),
            obs.row,
            obs.column,
            obs.description
        );
    }

    Ok(())
}
