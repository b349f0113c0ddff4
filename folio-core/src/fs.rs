//! Filesystem collaborator.
//!
//! Everything that touches the disk goes through [`FileSystem`], so tests can
//! count reads or fake modification times.

use std::path::Path;
use std::time::SystemTime;

/// Whole-file reads and modification-time lookups.
pub trait FileSystem: Send + Sync {
    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;

    /// Modification time of the file at `path`.
    fn modified(&self, path: &Path) -> std::io::Result<SystemTime>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn modified(&self, path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}
