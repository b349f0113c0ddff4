//! YAML site manifest.
//!
//! ```yaml
//! base: { file: layout.html }        # or { source: "..." }
//! static: { file: static.html }      # optional override of the static entry
//! pages:
//!   - name: home
//!     file: home.html                # or source: "..."
//! documents:
//!   - name: readme
//!     title: Read me
//!     style: "body { margin: 0 }"
//!     file: README.html              # or body: "<p>...</p>"
//! ```
//!
//! Relative paths resolve against the directory containing the manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::fs::{FileSystem, OsFileSystem};
use crate::pages::Pages;
use crate::sink::{RequestContext, ResponseSink};
use crate::static_content::{Bytes, File};

/// Default manifest file name looked up by the CLI.
pub const DEFAULT_MANIFEST: &str = "folio.yaml";

/// Where a template's source comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    File { file: PathBuf },
    Source { source: String },
}

/// A named page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub name: String,
    #[serde(flatten)]
    pub source: Source,
}

/// Where a static document's body comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    File { file: PathBuf },
    Body { body: String },
}

/// A named static document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub style: String,
    #[serde(flatten)]
    pub content: DocumentContent,
}

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub base: Source,
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_page: Option<Source>,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub documents: Vec<DocumentSpec>,
    #[serde(skip)]
    root: PathBuf,
}

impl Manifest {
    /// Load a manifest from `path`.
    ///
    /// Returns `ManifestError::NotFound` if absent,
    /// `ManifestError::Parse` (with path + line context) if malformed YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_yaml(&contents, root).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest YAML; relative paths resolve against `root`.
    pub fn from_yaml(contents: &str, root: impl Into<PathBuf>) -> Result<Self, serde_yaml::Error> {
        let mut manifest: Manifest = serde_yaml::from_str(contents)?;
        manifest.root = root.into();
        Ok(manifest)
    }

    /// Directory relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the manifest directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Build a registry and its documents on the real filesystem.
    pub fn build(&self) -> Result<Site, ManifestError> {
        self.build_with(Arc::new(OsFileSystem))
    }

    /// Build a registry and its documents, reading through `fs`.
    pub fn build_with(&self, fs: Arc<dyn FileSystem>) -> Result<Site, ManifestError> {
        let pages = match &self.base {
            Source::File { file } => Pages::from_file_with(fs, self.resolve(file))?,
            Source::Source { source } => Pages::from_source_with(fs, source)?,
        };

        match &self.static_page {
            Some(Source::File { file }) => pages.static_file(self.resolve(file))?,
            Some(Source::Source { source }) => pages.static_source(source.as_str())?,
            None => {}
        }

        for page in &self.pages {
            match &page.source {
                Source::File { file } => pages.register_file(&page.name, self.resolve(file))?,
                Source::Source { source } => pages.register_source(&page.name, source.as_str())?,
            }
        }

        let mut documents = BTreeMap::new();
        for spec in &self.documents {
            if documents.contains_key(&spec.name) {
                return Err(ManifestError::DuplicateDocument {
                    name: spec.name.clone(),
                });
            }
            let document = match &spec.content {
                DocumentContent::File { file } => Document::File(pages.file(
                    spec.title.as_str(),
                    spec.style.as_str(),
                    self.resolve(file),
                )),
                DocumentContent::Body { body } => Document::Bytes(pages.bytes(
                    spec.title.as_str(),
                    spec.style.as_str(),
                    body.as_str(),
                )),
            };
            documents.insert(spec.name.clone(), document);
        }

        tracing::debug!(
            "built site with {} page(s) and {} document(s)",
            self.pages.len(),
            documents.len()
        );
        Ok(Site { pages, documents })
    }
}

/// A static document of either kind.
#[derive(Debug)]
pub enum Document {
    Bytes(Bytes),
    File(File),
}

impl Document {
    pub fn serve(&self, sink: &mut dyn ResponseSink, request: &RequestContext) {
        match self {
            Document::Bytes(doc) => doc.serve(sink, request),
            Document::File(doc) => doc.serve(sink, request),
        }
    }
}

/// Registry plus the documents declared next to it.
#[derive(Debug)]
pub struct Site {
    pub pages: Pages,
    pub documents: BTreeMap<String, Document>,
}

impl Site {
    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }
}
