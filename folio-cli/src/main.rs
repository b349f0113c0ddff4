//! Folio — render pages and static documents from a site manifest.
//!
//! # Usage
//!
//! ```text
//! folio render <page> [--data data.json] [--path /request/path]
//! folio document <name>
//! folio check
//! folio list
//! ```
//!
//! Every command accepts `--manifest <file>` (default `folio.yaml`).

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, document::DocumentArgs, list::ListArgs, render::RenderArgs};
use folio_core::manifest::DEFAULT_MANIFEST;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Render pages from reloadable templates",
    long_about = None,
)]
struct Cli {
    /// Site manifest to load.
    #[arg(long, global = true, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a registered page to stdout.
    Render(RenderArgs),

    /// Serve a static document to stdout.
    Document(DocumentArgs),

    /// Build the site, reload it once, and report what is registered.
    Check(CheckArgs),

    /// List registered pages and documents.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(&cli.manifest),
        Commands::Document(args) => args.run(&cli.manifest),
        Commands::Check(args) => args.run(&cli.manifest),
        Commands::List(args) => args.run(&cli.manifest),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
