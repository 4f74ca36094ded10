//! Access to file contents and glob expansion.
//!
//! The index never touches the file system directly; it goes through a
//! [`Storage`] so hosts with their own virtual file system can plug in.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;

pub trait Storage {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Expands a glob pattern to the files it matches
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping unreadable glob match: {}", e),
            }
        }
        Ok(files)
    }
}

/// Makes `path` absolute and collapses `.` and `..` without touching the
/// file system, so a file keeps one identity whether or not it exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Expands a leading `~/` to the home directory
pub fn expand_home(pattern: &str) -> String {
    match (pattern.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest).to_string_lossy().into_owned(),
        _ => pattern.to_string(),
    }
}
