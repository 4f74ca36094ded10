//! Resolves textual include references to the files they name.

use std::path::{Path, PathBuf};

use crate::indexer::storage::normalize_path;
use crate::languages::LanguageGrammar;

pub struct IncludeResolver;

impl IncludeResolver {
    pub fn new() -> Self {
        Self
    }

    /// File names referenced by `text`, as written. Languages without an
    /// include form yield nothing.
    pub fn includes(&self, grammar: Option<&dyn LanguageGrammar>, text: &str) -> Vec<String> {
        grammar.map(|g| g.includes(text)).unwrap_or_default()
    }

    /// Referenced files resolved against the directory of `file_path`
    pub fn resolve(
        &self,
        grammar: Option<&dyn LanguageGrammar>,
        file_path: &Path,
        text: &str,
    ) -> Vec<PathBuf> {
        let dir = file_path.parent().unwrap_or_else(|| Path::new(""));
        let mut resolved: Vec<PathBuf> = Vec::new();
        for name in self.includes(grammar, text) {
            let path = normalize_path(&dir.join(name));
            if !resolved.contains(&path) {
                resolved.push(path);
            }
        }
        resolved
    }
}

impl Default for IncludeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::c_family::CFamilyGrammar;
    use crate::languages::java::JavaGrammar;

    #[test]
    fn test_resolve_relative_to_file() {
        let resolver = IncludeResolver::new();
        let text = "#include \"list.h\"\n#include \"../common/str.h\"\n#include <stdlib.h>\n";
        let paths = resolver.resolve(Some(&CFamilyGrammar), Path::new("/proj/src/main.c"), text);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/proj/src/list.h"),
                PathBuf::from("/proj/common/str.h"),
            ]
        );
    }

    #[test]
    fn test_duplicates_resolved_once() {
        let resolver = IncludeResolver::new();
        let text = "#include \"a.h\"\n#include \"./a.h\"\n";
        let paths = resolver.resolve(Some(&CFamilyGrammar), Path::new("/p/x.c"), text);
        assert_eq!(paths, vec![PathBuf::from("/p/a.h")]);
    }

    #[test]
    fn test_other_languages_have_no_includes() {
        let resolver = IncludeResolver::new();
        let text = "#include \"a.h\"\nimport java.util.List;";
        assert!(resolver.includes(Some(&JavaGrammar), text).is_empty());
        assert!(resolver.includes(None, text).is_empty());
    }
}
