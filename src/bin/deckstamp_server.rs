//! HTTP server binary for the report generator.
//!
//! Serves the thin report API over a template deck and a default config
//! on disk. See `deckstamp::server` for the routes.

use clap::Parser;
use deckstamp::server::{ServerConfig, serve};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Serve the report-generation HTTP API.
#[derive(Parser, Debug)]
#[command(name = "deckstamp-server", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Path to the template PPTX file
    #[arg(long)]
    template: PathBuf,

    /// Path to the default config JSON file
    #[arg(long)]
    config: PathBuf,

    /// Directory generated reports are written into
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    serve(ServerConfig {
        bind: args.bind,
        template_path: args.template,
        config_path: args.config,
        output_dir: args.output_dir,
    })
    .await
}
