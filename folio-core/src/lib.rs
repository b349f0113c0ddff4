//! Folio core library — hot-reloadable page registry and static documents.
//!
//! Public API surface:
//! - [`pages`] — [`Pages`], the concurrent template registry
//! - [`hook`] — [`ContentHook`], per-registry data transform
//! - [`static_content`] — [`Bytes`] and [`File`] static documents
//! - [`sink`] — transport boundary ([`ResponseSink`], [`Status`])
//! - [`fs`] — filesystem collaborator
//! - [`manifest`] — YAML site manifest
//! - [`error`] — [`PagesError`], [`ManifestError`]

pub mod error;
pub mod fs;
pub mod hook;
pub mod manifest;
pub mod pages;
pub mod sink;
pub mod static_content;

pub use error::{ManifestError, PagesError};
pub use fs::{FileSystem, OsFileSystem};
pub use hook::ContentHook;
pub use manifest::{Document, Manifest, Site};
pub use pages::Pages;
pub use sink::{BufferSink, RequestContext, ResponseSink, Status};
pub use static_content::{Bytes, File, StaticDocument, STATIC, STATIC_TEMPLATE};
