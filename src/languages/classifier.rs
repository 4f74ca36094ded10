//! Maps files to their canonical language, caching the answer per file.
//!
//! Two entry points exist: the file extension, authoritative for files on
//! disk, and the syntax name reported by the editor, authoritative for
//! unsaved buffers. A recognized syntax name replaces whatever was cached
//! for the path; otherwise the first answer sticks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{LanguageRegistry, LanguageTag};

pub struct LanguageClassifier {
    cache: HashMap<PathBuf, LanguageTag>,
}

impl LanguageClassifier {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub fn classify_path(&mut self, registry: &LanguageRegistry, path: &Path) -> LanguageTag {
        if let Some(tag) = self.cache.get(path) {
            return *tag;
        }
        let tag = registry.tag_for_file(path);
        self.cache.insert(path.to_path_buf(), tag);
        tag
    }

    /// Classifies `path` by the editor's syntax name. An unknown syntax
    /// falls back to the cached answer, then to the extension.
    pub fn classify_syntax(
        &mut self,
        registry: &LanguageRegistry,
        path: &Path,
        syntax: &str,
    ) -> LanguageTag {
        match registry.tag_for_syntax(syntax) {
            LanguageTag::Unsupported => self.classify_path(registry, path),
            tag => {
                self.cache.insert(path.to_path_buf(), tag);
                tag
            }
        }
    }

    pub fn cached(&self, path: &Path) -> Option<LanguageTag> {
        self.cache.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}
