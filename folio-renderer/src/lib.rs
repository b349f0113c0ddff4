//! # folio-renderer
//!
//! Tera-backed compilation of page templates against a shared base layout.
//!
//! ## Usage
//!
//! ```rust
//! use folio_renderer::BaseDefinitions;
//! use serde_json::json;
//!
//! let base = BaseDefinitions::parse("<title>{% block title %}{% endblock %}</title>").unwrap();
//! let unit = base
//!     .compile(r#"{% extends "base.html" %}{% block title %}{{ name }}{% endblock %}"#)
//!     .unwrap();
//! assert_eq!(unit.render(&json!({ "name": "home" })).unwrap(), "<title>home</title>");
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::to_tera_context;
pub use engine::{BaseDefinitions, RenderUnit, BASE_TEMPLATE, PAGE_TEMPLATE};
pub use error::RenderError;
