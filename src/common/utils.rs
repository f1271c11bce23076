//! Filesystem implementations and path helpers

use crate::common::traits::FileSystem;
use crate::error::{AuthError, Result};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// The real filesystem and the real home directory
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory filesystem, mostly useful for exercising the resolver without disk access
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    home: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }
}

/// Path helpers
pub struct PathUtils;

impl PathUtils {
    /// Expand a leading `~/` to the home directory reported by `fs`
    ///
    /// Only the `~/` prefix is recognised; `~user/` forms and a bare `~` are
    /// returned unchanged.
    pub fn expand_home(path: &str, fs: &impl FileSystem) -> Result<PathBuf> {
        match path.strip_prefix("~/") {
            Some(rest) => {
                let home = fs.home_dir().ok_or_else(|| AuthError::PathExpansion {
                    path: path.to_string(),
                })?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(path)),
        }
    }
}
