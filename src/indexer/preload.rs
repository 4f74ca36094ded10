//! Files that stay indexed regardless of which file the editor shows.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::indexer::storage::{expand_home, normalize_path, Storage};

#[derive(Debug, Clone, Default)]
pub struct PreloadSet {
    paths: Vec<PathBuf>,
    lookup: HashSet<PathBuf>,
}

impl PreloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands `patterns` through `storage`, drops matches whose basename is
    /// listed in `exclude_files` and deduplicates in first-match order.
    /// A malformed pattern is skipped.
    pub fn resolve<S: Storage + ?Sized>(
        storage: &S,
        patterns: &[String],
        exclude_files: &[String],
    ) -> Self {
        let mut set = Self::new();

        for pattern in patterns {
            let pattern = expand_home(pattern);
            let matches = match storage.glob(&pattern) {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("Skipping preload pattern '{}': {}", pattern, e);
                    continue;
                }
            };

            for path in matches {
                let excluded = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| exclude_files.iter().any(|e| e == name));
                if excluded {
                    debug!("Excluded from preload: {}", path.display());
                    continue;
                }
                set.insert(normalize_path(&path));
            }
        }

        set
    }

    fn insert(&mut self, path: PathBuf) {
        if self.lookup.insert(path.clone()) {
            self.paths.push(path);
        }
    }

    /// `path` must already be normalized
    pub fn contains(&self, path: &Path) -> bool {
        self.lookup.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
