//! Template registry.
//!
//! # Generations
//!
//! A registry owns one parsed base layout and a map of named pages compiled
//! against it. Together with the content hook these form the current
//! generation, guarded by a single `RwLock`:
//!
//! - `execute` takes the shared lock just long enough to clone the unit and
//!   hook handles, then renders without holding it.
//! - `register_*`, `rebuild` and `set_hook` take the exclusive lock for their
//!   whole duration, file reads included.
//!
//! `rebuild` builds a complete new generation off to the side and only
//! installs it once every page compiled; on error the live one is untouched.
//!
//! # Rebuild policy for inline pages
//!
//! | base origin | page origin | on rebuild                                 |
//! |-------------|-------------|--------------------------------------------|
//! | file        | file        | re-read and recompiled against new base    |
//! | file        | source      | recompiled against new base                |
//! | source      | file        | re-read and recompiled against same base   |
//! | source      | source      | carried over as-is                         |

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use folio_renderer::{BaseDefinitions, RenderUnit};

use crate::error::{load_err, parse_err, PagesError};
use crate::fs::{FileSystem, OsFileSystem};
use crate::hook::ContentHook;
use crate::sink::{RequestContext, ResponseSink};

/// Name used in errors that concern the base layout itself.
const BASE_LABEL: &str = "base";

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Source(String),
}

#[derive(Debug, Clone)]
struct Entry {
    unit: Arc<RenderUnit>,
    origin: Origin,
}

#[derive(Debug)]
struct Generation {
    base: BaseDefinitions,
    entries: HashMap<String, Entry>,
    hook: ContentHook,
}

struct Inner {
    /// `Some` when the base was loaded from disk and is re-read on rebuild.
    base_path: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    state: RwLock<Generation>,
}

/// Thread-safe, hot-reloadable registry of named pages.
///
/// `Pages` is a cheap handle; clones share the same registry.
#[derive(Clone)]
pub struct Pages {
    inner: Arc<Inner>,
}

impl Pages {
    /// Load the base layout from `path` on the real filesystem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PagesError> {
        Self::from_file_with(Arc::new(OsFileSystem), path)
    }

    /// Load the base layout from `path` through `fs`.
    pub fn from_file_with(
        fs: Arc<dyn FileSystem>,
        path: impl AsRef<Path>,
    ) -> Result<Self, PagesError> {
        let path = path.as_ref().to_path_buf();
        let base = load_base(fs.as_ref(), &path)?;
        tracing::debug!("loaded base template from {}", path.display());
        Ok(Self::with_base(fs, Some(path), base))
    }

    /// Parse the base layout from literal `source`.
    pub fn from_source(source: &str) -> Result<Self, PagesError> {
        Self::from_source_with(Arc::new(OsFileSystem), source)
    }

    /// Parse the base layout from literal `source`; page files are read through `fs`.
    pub fn from_source_with(fs: Arc<dyn FileSystem>, source: &str) -> Result<Self, PagesError> {
        let base = BaseDefinitions::parse(source).map_err(|e| parse_err(BASE_LABEL, e))?;
        Ok(Self::with_base(fs, None, base))
    }

    fn with_base(fs: Arc<dyn FileSystem>, base_path: Option<PathBuf>, base: BaseDefinitions) -> Self {
        Pages {
            inner: Arc::new(Inner {
                base_path,
                fs,
                state: RwLock::new(Generation {
                    base,
                    entries: HashMap::new(),
                    hook: ContentHook::identity(),
                }),
            }),
        }
    }

    /// Register a page whose source is read from `path`.
    ///
    /// The file is re-read on every [`rebuild`](Self::rebuild).
    pub fn register_file(
        &self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), PagesError> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();
        let mut state = self.inner.state.write();
        if state.entries.contains_key(&name) {
            return Err(PagesError::DuplicateName { name });
        }
        let unit = compile_file(self.inner.fs.as_ref(), &state.base, &path)?;
        tracing::debug!("registered template '{name}' from {}", path.display());
        state.entries.insert(
            name,
            Entry {
                unit,
                origin: Origin::File(path),
            },
        );
        Ok(())
    }

    /// Register a page from literal `source`.
    pub fn register_source(
        &self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), PagesError> {
        let name = name.into();
        let mut state = self.inner.state.write();
        if state.entries.contains_key(&name) {
            return Err(PagesError::DuplicateName { name });
        }
        insert_source(&mut state, name, source.into())
    }

    /// Register `source` under `name` unless something is already there.
    ///
    /// Returns `true` if a new page was registered.
    pub(crate) fn register_source_if_absent(
        &self,
        name: &str,
        source: &str,
    ) -> Result<bool, PagesError> {
        let mut state = self.inner.state.write();
        if state.entries.contains_key(name) {
            return Ok(false);
        }
        insert_source(&mut state, name.to_string(), source.to_string())?;
        Ok(true)
    }

    /// Render page `name` against `data` and write the output to `sink`.
    ///
    /// The current content hook runs on the serialised data first. Output is
    /// produced in full before the first byte reaches `sink`.
    pub fn execute<T>(
        &self,
        sink: &mut dyn ResponseSink,
        request: &RequestContext,
        name: &str,
        data: &T,
    ) -> Result<(), PagesError>
    where
        T: Serialize + ?Sized,
    {
        let (unit, hook) = {
            let state = self.inner.state.read();
            let entry = state
                .entries
                .get(name)
                .ok_or_else(|| PagesError::UnknownTemplate {
                    name: name.to_string(),
                })?;
            (Arc::clone(&entry.unit), state.hook.clone())
        };

        let data: Value = serde_json::to_value(data)?;
        let data = hook.apply(sink, request, data);
        let output = unit.render(&data).map_err(|source| PagesError::Render {
            name: name.to_string(),
            source,
        })?;
        sink.write_all(output.as_bytes()).map_err(PagesError::Write)
    }

    /// Reload the base and every page, then swap them in together.
    ///
    /// All-or-nothing: if any source fails to load or parse, the registry
    /// keeps serving the previous generation.
    pub fn rebuild(&self) -> Result<(), PagesError> {
        let mut state = self.inner.state.write();
        let (base, entries) = match self.next_generation(&state) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!("error reloading templates, keeping previous set: {err}");
                return Err(err);
            }
        };
        tracing::info!("reloaded {} template(s)", entries.len());
        state.base = base;
        state.entries = entries;
        Ok(())
    }

    fn next_generation(
        &self,
        current: &Generation,
    ) -> Result<(BaseDefinitions, HashMap<String, Entry>), PagesError> {
        let fs = self.inner.fs.as_ref();
        let base = match &self.inner.base_path {
            Some(path) => load_base(fs, path)?,
            None => current.base.clone(),
        };
        let base_is_file = self.inner.base_path.is_some();

        let mut entries = HashMap::with_capacity(current.entries.len());
        for (name, entry) in &current.entries {
            let unit = match &entry.origin {
                Origin::File(path) => compile_file(fs, &base, path)?,
                Origin::Source(source) if base_is_file => compile_source(&base, name, source)?,
                Origin::Source(_) => Arc::clone(&entry.unit),
            };
            entries.insert(
                name.clone(),
                Entry {
                    unit,
                    origin: entry.origin.clone(),
                },
            );
        }
        Ok((base, entries))
    }

    /// Replace the content hook for every later `execute`.
    pub fn set_hook<F>(&self, hook: F)
    where
        F: Fn(&mut dyn ResponseSink, &RequestContext, Value) -> Value + Send + Sync + 'static,
    {
        self.inner.state.write().hook = ContentHook::new(hook);
    }

    /// Restore the identity hook.
    pub fn reset_hook(&self) {
        self.inner.state.write().hook = ContentHook::identity();
    }

    /// `true` if a page is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.state.read().entries.contains_key(name)
    }

    /// Registered page names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.state.read().entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Path the base layout was loaded from, if it came from disk.
    pub fn base_path(&self) -> Option<&Path> {
        self.inner.base_path.as_deref()
    }

    /// Filesystem collaborator shared with adapters built on this registry.
    pub fn filesystem(&self) -> &dyn FileSystem {
        self.inner.fs.as_ref()
    }

    #[cfg(test)]
    fn unit(&self, name: &str) -> Option<Arc<RenderUnit>> {
        self.inner
            .state
            .read()
            .entries
            .get(name)
            .map(|e| Arc::clone(&e.unit))
    }
}

impl std::fmt::Debug for Pages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages")
            .field("base_path", &self.inner.base_path)
            .field("names", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn read_source(fs: &dyn FileSystem, path: &Path) -> Result<String, PagesError> {
    let bytes = fs.read(path).map_err(|e| load_err(path, e))?;
    String::from_utf8(bytes)
        .map_err(|e| load_err(path, std::io::Error::new(ErrorKind::InvalidData, e)))
}

fn load_base(fs: &dyn FileSystem, path: &Path) -> Result<BaseDefinitions, PagesError> {
    let source = read_source(fs, path)?;
    BaseDefinitions::parse(&source).map_err(|e| parse_err(path.display().to_string(), e))
}

fn compile_file(
    fs: &dyn FileSystem,
    base: &BaseDefinitions,
    path: &Path,
) -> Result<Arc<RenderUnit>, PagesError> {
    let source = read_source(fs, path)?;
    compile_source(base, &path.display().to_string(), &source)
}

fn compile_source(
    base: &BaseDefinitions,
    label: &str,
    source: &str,
) -> Result<Arc<RenderUnit>, PagesError> {
    base.compile(source)
        .map(Arc::new)
        .map_err(|e| parse_err(label, e))
}

fn insert_source(state: &mut Generation, name: String, source: String) -> Result<(), PagesError> {
    let unit = compile_source(&state.base, &name, &source)?;
    tracing::debug!("registered template '{name}'");
    state.entries.insert(
        name,
        Entry {
            unit,
            origin: Origin::Source(source),
        },
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
