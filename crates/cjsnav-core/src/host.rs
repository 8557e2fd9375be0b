//! File-host abstraction.
//!
//! The engine's only collaborator interface into the filesystem (or
//! an editor's document layer). Queries read at most one additional
//! file: the resolved target.

use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Read-only view of the file tree a query may touch.
pub trait FileHost {
    /// The exact current text of the file at `path`.
    fn read_file(&self, path: &Path) -> io::Result<String>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

/// Host backed by the operating-system filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileHost;

impl FileHost for OsFileHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory host for tests and editor buffers that have not been
/// saved to disk. Directories are inferred from the stored paths.
#[derive(Debug, Default)]
pub struct MemoryFileHost {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryFileHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file.
    pub fn set_file(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl FileHost for MemoryFileHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display())))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .keys()
            .any(|stored| stored != path && stored.starts_with(path))
    }
}
