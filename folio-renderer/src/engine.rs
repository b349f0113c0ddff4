//! Tera engine — [`BaseDefinitions`] and the [`RenderUnit`]s compiled from it.
//!
//! # Template names
//!
//! | Template     | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | `base.html`  | the shared base layout (blocks, macros)              |
//! | `page.html`  | one compiled page; may `{% extends "base.html" %}`   |
//!
//! Both names carry the `.html` suffix so Tera autoescapes variables.
//! Trusted markup must be emitted with `| safe`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tera::Tera;

use crate::context::to_tera_context;
use crate::error::RenderError;

/// Name the base layout is registered under in every generation.
pub const BASE_TEMPLATE: &str = "base.html";

/// Name a compiled page is registered under inside its own clone of the base.
pub const PAGE_TEMPLATE: &str = "page.html";

// ---------------------------------------------------------------------------
// BaseDefinitions
// ---------------------------------------------------------------------------

/// Parsed base layout shared by every unit compiled from it.
///
/// Immutable once parsed. Cloning is an `Arc` bump; [`compile`](Self::compile)
/// works on a private copy, so the base never sees a page template.
#[derive(Clone)]
pub struct BaseDefinitions {
    tera: Arc<Tera>,
}

impl BaseDefinitions {
    /// Parse `source` as the base layout.
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(BASE_TEMPLATE, source)
            .map_err(RenderError::Parse)?;
        Ok(BaseDefinitions { tera: Arc::new(tera) })
    }

    /// Compile a page template against a copy of this base.
    pub fn compile(&self, source: &str) -> Result<RenderUnit, RenderError> {
        let mut tera = Tera::clone(&self.tera);
        tera.add_raw_template(PAGE_TEMPLATE, source)
            .map_err(RenderError::Parse)?;
        Ok(RenderUnit {
            tera,
            base: self.clone(),
        })
    }

    /// `true` if both handles point at the same parsed base.
    pub fn same_generation(&self, other: &BaseDefinitions) -> bool {
        Arc::ptr_eq(&self.tera, &other.tera)
    }
}

impl fmt::Debug for BaseDefinitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        f.debug_struct("BaseDefinitions")
            .field("templates", &names)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RenderUnit
// ---------------------------------------------------------------------------

/// A page compiled against one [`BaseDefinitions`] generation.
pub struct RenderUnit {
    tera: Tera,
    base: BaseDefinitions,
}

impl RenderUnit {
    /// Execute the page against `data`.
    ///
    /// The whole output is produced in memory; nothing is returned on error.
    pub fn render(&self, data: &Value) -> Result<String, RenderError> {
        let ctx = to_tera_context(data);
        self.tera
            .render(PAGE_TEMPLATE, &ctx)
            .map_err(RenderError::Execute)
    }

    /// The base generation this unit was compiled against.
    pub fn base(&self) -> &BaseDefinitions {
        &self.base
    }
}

impl fmt::Debug for RenderUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderUnit")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
