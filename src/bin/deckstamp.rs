//! Command-line interface for the report generator.
//!
//! Sequences the core pipeline: load config → load deck → replace
//! placeholders → save. Prints the output path and exits 0 on success;
//! logs the error and exits 1 on any failure.

use clap::Parser;
use deckstamp::config::load_config;
use deckstamp::editor::ReportEditor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate PPT reports from a JSON config.
#[derive(Parser, Debug)]
#[command(name = "deckstamp", version, about)]
struct Args {
    /// Path to the config JSON file
    #[arg(long)]
    config: PathBuf,

    /// Path to the input PPTX file
    #[arg(long)]
    input: PathBuf,

    /// Output directory
    #[arg(long)]
    output_dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(&args) {
        Ok(path) => println!("Report generated: {}", path.display()),
        Err(e) => {
            tracing::error!(error = %e, "report generation failed");
            std::process::exit(1);
        },
    }
}

fn run(args: &Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !args.config.exists() {
        return Err(format!("config file not found: {}", args.config.display()).into());
    }
    if !args.input.exists() {
        return Err(format!("input file not found: {}", args.input.display()).into());
    }

    let config = load_config(&args.config)?;

    let mut editor = ReportEditor::new(&args.input);
    editor.load()?;
    editor.replace_in_slide(config.slide_number, &config.replacement_pairs())?;

    Ok(editor.save(&args.output_dir)?)
}
