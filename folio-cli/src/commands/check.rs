//! `folio check` — build the site, reload it once, report what loaded.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

/// Arguments for `folio check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip the reload pass.
    #[arg(long)]
    pub no_rebuild: bool,
}

impl CheckArgs {
    pub fn run(self, manifest: &Path) -> Result<()> {
        let site = super::load_site(manifest)?;
        if !self.no_rebuild {
            site.pages.rebuild().context("rebuild failed")?;
            tracing::info!("rebuilt {}", manifest.display());
        }
        println!(
            "✓ {} ok ({} page(s), {} document(s))",
            manifest.display(),
            site.pages.names().len(),
            site.documents.len()
        );
        Ok(())
    }
}
