//! Error types for folio-core.

use std::path::PathBuf;

use thiserror::Error;

use folio_renderer::RenderError;

/// All errors that can arise from registry operations.
#[derive(Debug, Error)]
pub enum PagesError {
    /// A template source file could not be read.
    #[error("error loading template ({path}): {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A base or page template source is malformed.
    #[error("error initialising template ({name}): {source}")]
    Parse {
        name: String,
        #[source]
        source: RenderError,
    },

    /// A page is already registered under this name.
    #[error("template already exists: {name}")]
    DuplicateName { name: String },

    /// No page is registered under this name.
    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Executing a page against its data failed.
    #[error("error writing template ({name}): {source}")]
    Render {
        name: String,
        #[source]
        source: RenderError,
    },

    /// Data handed to `execute` could not be serialised.
    #[error("context serialization error: {0}")]
    Context(#[from] serde_json::Error),

    /// The sink refused the rendered bytes.
    #[error("error writing response: {0}")]
    Write(#[source] std::io::Error),
}

/// All errors that can arise from loading or building a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file did not exist.
    #[error("manifest not found at {path}")]
    NotFound { path: PathBuf },

    /// The manifest file exists but could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Two documents share a name.
    #[error("duplicate document name in manifest: {name}")]
    DuplicateDocument { name: String },

    /// Building the registry from the manifest failed.
    #[error("registry error: {0}")]
    Pages(#[from] PagesError),
}

/// Convenience constructor for [`PagesError::Load`].
pub(crate) fn load_err(path: impl Into<PathBuf>, source: std::io::Error) -> PagesError {
    PagesError::Load {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`PagesError::Parse`].
pub(crate) fn parse_err(name: impl Into<String>, source: RenderError) -> PagesError {
    PagesError::Parse {
        name: name.into(),
        source,
    }
}
