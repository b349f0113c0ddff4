//! `folio list` — list registered pages and documents.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use folio_core::{Document, STATIC};

/// Arguments for `folio list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include the built-in static entry.
    #[arg(long)]
    pub all: bool,
}

impl ListArgs {
    pub fn run(self, manifest: &Path) -> Result<()> {
        let site = super::load_site(manifest)?;

        println!("pages:");
        for name in site.pages.names() {
            if name == STATIC && !self.all {
                continue;
            }
            println!("  {name}");
        }

        println!("documents:");
        for (name, document) in &site.documents {
            match document {
                Document::Bytes(_) => println!("  {name}"),
                Document::File(file) => println!("  {name} ({})", file.path().display()),
            }
        }
        Ok(())
    }
}
