//! Capability interfaces for the operating-system boundary
//!
//! Credential resolution only ever needs two things from the host: where the
//! current user's home directory is, and the bytes of a file. Keeping those
//! behind a trait lets the resolver run against an in-memory filesystem.

use std::io;
use std::path::{Path, PathBuf};

/// Host access needed to resolve file-based credentials
pub trait FileSystem {
    /// Home directory of the current user, if one can be determined
    fn home_dir(&self) -> Option<PathBuf>;

    /// Read the full contents of a file
    ///
    /// Implementations must not keep the file open once this returns.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}
