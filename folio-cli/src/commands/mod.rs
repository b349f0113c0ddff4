pub mod check;
pub mod document;
pub mod list;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{Manifest, Site};

/// Load the manifest at `path` and build its site.
pub fn load_site(path: &Path) -> Result<Site> {
    let manifest = Manifest::load(path)
        .with_context(|| format!("could not load manifest {}", path.display()))?;
    tracing::debug!("loaded manifest {}", path.display());
    let site = manifest
        .build()
        .with_context(|| format!("could not build site from {}", path.display()))?;
    tracing::debug!(
        "built {} page(s) and {} document(s)",
        site.pages.names().len(),
        site.documents.len()
    );
    Ok(site)
}
