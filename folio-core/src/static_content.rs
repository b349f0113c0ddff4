//! Static documents — fixed `{title, style, body}` pages served through the
//! registry's built-in static entry.
//!
//! [`Bytes`] holds its document in memory. [`File`] keeps its body in sync
//! with a file on disk, re-reading it only when the modification time moves
//! forward.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::PagesError;
use crate::fs::FileSystem;
use crate::pages::Pages;
use crate::sink::{RequestContext, ResponseSink, Status};

/// Registry name of the built-in static entry.
pub const STATIC: &str = "-static-";

/// Source of the built-in static entry.
///
/// The base layout is expected to declare `title`, `style` and `body` blocks.
/// Only `title` is escaped; `style` and `body` are emitted verbatim.
pub const STATIC_TEMPLATE: &str = concat!(
    r#"{% extends "base.html" %}"#,
    "{% block title %}{{ title }}{% endblock %}",
    "{% block style %}{{ style | safe }}{% endblock %}",
    "{% block body %}\n{{ body | safe }}{% endblock %}",
);

/// Data rendered by the static entry. `body` is trusted markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticDocument {
    pub title: String,
    pub style: String,
    pub body: String,
}

impl Pages {
    /// Register the static entry from a file instead of [`STATIC_TEMPLATE`].
    pub fn static_file(&self, path: impl AsRef<Path>) -> Result<(), PagesError> {
        self.register_file(STATIC, path)
    }

    /// Register the static entry from literal source instead of [`STATIC_TEMPLATE`].
    pub fn static_source(&self, source: impl Into<String>) -> Result<(), PagesError> {
        self.register_source(STATIC, source)
    }

    /// In-memory static document.
    pub fn bytes(
        &self,
        title: impl Into<String>,
        style: impl Into<String>,
        body: impl Into<String>,
    ) -> Bytes {
        self.ensure_static();
        Bytes {
            pages: self.clone(),
            document: StaticDocument {
                title: title.into(),
                style: style.into(),
                body: body.into(),
            },
        }
    }

    /// Static document whose body is the contents of `path`.
    ///
    /// The file is not touched until the first [`File::serve`].
    pub fn file(
        &self,
        title: impl Into<String>,
        style: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> File {
        self.ensure_static();
        File {
            pages: self.clone(),
            path: path.into(),
            cache: RwLock::new(FileCache {
                document: Arc::new(StaticDocument {
                    title: title.into(),
                    style: style.into(),
                    body: String::new(),
                }),
                last_modified: None,
            }),
        }
    }

    fn ensure_static(&self) {
        match self.register_source_if_absent(STATIC, STATIC_TEMPLATE) {
            Ok(true) => tracing::debug!("registered built-in static template"),
            Ok(false) => {}
            Err(err) => tracing::warn!("could not register static template: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bytes
// ---------------------------------------------------------------------------

/// Immutable static document.
#[derive(Debug, Clone)]
pub struct Bytes {
    pages: Pages,
    document: StaticDocument,
}

impl Bytes {
    pub fn document(&self) -> &StaticDocument {
        &self.document
    }

    pub fn serve(&self, sink: &mut dyn ResponseSink, request: &RequestContext) {
        serve_static(&self.pages, sink, request, &self.document);
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct FileCache {
    document: Arc<StaticDocument>,
    last_modified: Option<SystemTime>,
}

impl FileCache {
    fn is_stale(&self, modified: SystemTime) -> bool {
        self.last_modified.map_or(true, |last| modified > last)
    }
}

/// Static document backed by a file, refreshed on modification.
#[derive(Debug)]
pub struct File {
    pages: Pages,
    path: PathBuf,
    cache: RwLock<FileCache>,
}

impl File {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the currently cached body, if any was read.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.cache.read().last_modified
    }

    /// Serve the document, refreshing the cached body first if the file
    /// changed. Any stat or read failure sends `ServerError` and nothing else.
    pub fn serve(&self, sink: &mut dyn ResponseSink, request: &RequestContext) {
        let fs = self.pages.filesystem();
        let modified = match fs.modified(&self.path) {
            Ok(modified) => modified,
            Err(err) => {
                tracing::warn!("cannot stat {}: {err}", self.path.display());
                sink.send_status(Status::ServerError);
                return;
            }
        };

        let stale = self.cache.read().is_stale(modified);
        if stale {
            if let Err(err) = self.refresh(fs) {
                tracing::warn!("cannot refresh {}: {err}", self.path.display());
                sink.send_status(Status::ServerError);
                return;
            }
        }

        let document = Arc::clone(&self.cache.read().document);
        serve_static(&self.pages, sink, request, &document);
    }

    fn refresh(&self, fs: &dyn FileSystem) -> std::io::Result<()> {
        let mut cache = self.cache.write();
        // Another caller may have refreshed while we waited for the lock.
        let modified = fs.modified(&self.path)?;
        if !cache.is_stale(modified) {
            tracing::debug!("{} already refreshed", self.path.display());
            return Ok(());
        }
        let body = fs.read(&self.path)?;
        let document = StaticDocument {
            title: cache.document.title.clone(),
            style: cache.document.style.clone(),
            body: String::from_utf8_lossy(&body).into_owned(),
        };
        cache.document = Arc::new(document);
        cache.last_modified = Some(modified);
        tracing::info!("refreshed {}", self.path.display());
        Ok(())
    }
}

fn serve_static(
    pages: &Pages,
    sink: &mut dyn ResponseSink,
    request: &RequestContext,
    document: &StaticDocument,
) {
    match pages.execute(sink, request, STATIC, document) {
        Ok(()) => {}
        Err(err @ PagesError::UnknownTemplate { .. }) => {
            tracing::warn!("{err}");
            sink.send_status(Status::NotFound);
        }
        Err(PagesError::Write(err)) => {
            tracing::warn!("error writing static document: {err}");
        }
        Err(err) => {
            tracing::warn!("{err}");
            sink.send_status(Status::ServerError);
        }
    }
}
