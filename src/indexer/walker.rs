use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::Result;
use crate::languages::{LanguageRegistry, LanguageTag};

/// Lists the files under a directory that some grammar understands,
/// honoring `.gitignore` and skipping hidden entries.
pub struct FileWalker<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> FileWalker<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_file() && self.is_supported(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.language(path).is_supported()
    }

    pub fn language(&self, path: &Path) -> LanguageTag {
        self.registry.tag_for_file(path)
    }
}
