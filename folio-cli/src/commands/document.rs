//! `folio document <name>` — serve a static document to stdout.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use folio_core::{BufferSink, RequestContext, Status};

/// Arguments for `folio document`.
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Name of the document to serve.
    pub name: String,
}

impl DocumentArgs {
    pub fn run(self, manifest: &Path) -> Result<()> {
        let site = super::load_site(manifest)?;
        let document = site
            .document(&self.name)
            .with_context(|| format!("no document named '{}'", self.name))?;

        let mut sink = BufferSink::new();
        document.serve(&mut sink, &RequestContext::new(format!("/{}", self.name)));
        let status = sink.effective_status();
        if status != Status::Ok {
            bail!("document '{}' failed: {status}", self.name);
        }

        std::io::stdout()
            .write_all(sink.body())
            .context("could not write to stdout")?;
        Ok(())
    }
}
