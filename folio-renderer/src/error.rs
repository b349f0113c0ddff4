//! Error types for folio-renderer.

use thiserror::Error;

/// All errors that can arise from parsing or executing templates.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera rejected the template source.
    #[error("template parse error: {0}")]
    Parse(#[source] tera::Error),

    /// Tera failed while executing a parsed template against data.
    #[error("template execution error: {0}")]
    Execute(#[source] tera::Error),
}
