//! `folio render <page>` — render a registered page to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use folio_core::{BufferSink, RequestContext, ResponseSink};

/// Arguments for `folio render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Name of the page to render.
    pub page: String,

    /// JSON file with the data to render against (default: `{}`).
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Request path, exposed to the page as `path`.
    #[arg(long, default_value = "/")]
    pub path: String,
}

impl RenderArgs {
    pub fn run(self, manifest: &Path) -> Result<()> {
        let site = super::load_site(manifest)?;
        let data = match &self.data {
            Some(path) => read_data(path)?,
            None => Value::Object(Default::default()),
        };

        site.pages.set_hook(expose_request_path);

        let mut sink = BufferSink::new();
        site.pages
            .execute(&mut sink, &RequestContext::new(self.path.clone()), &self.page, &data)
            .with_context(|| format!("render failed for '{}'", self.page))?;

        std::io::stdout()
            .write_all(sink.body())
            .context("could not write to stdout")?;
        Ok(())
    }
}

/// Make the request path available as `path` unless the data already has one.
fn expose_request_path(
    _sink: &mut dyn ResponseSink,
    request: &RequestContext,
    mut data: Value,
) -> Value {
    if let Value::Object(map) = &mut data {
        map.entry("path")
            .or_insert_with(|| Value::String(request.path.clone()));
    }
    data
}

fn read_data(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not read data file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("invalid JSON in {}", path.display()))
}
