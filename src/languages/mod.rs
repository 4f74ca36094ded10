pub mod c_family;
pub mod classifier;
pub mod html;
pub mod java;
pub mod javascript;
pub mod json;
pub mod python;

pub use classifier::LanguageClassifier;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

/// Canonical language of a file. C, C++, Objective-C and Objective-C++ share
/// `CLikeFamily`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LanguageTag {
    CLikeFamily,
    JavaScriptLike,
    Java,
    Python,
    Json,
    Html,
    Unsupported,
}

impl LanguageTag {
    pub fn is_supported(self) -> bool {
        self != LanguageTag::Unsupported
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageTag::CLikeFamily => "c-family",
            LanguageTag::JavaScriptLike => "javascript",
            LanguageTag::Java => "java",
            LanguageTag::Python => "python",
            LanguageTag::Json => "json",
            LanguageTag::Html => "html",
            LanguageTag::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function-like declaration found in raw text, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSymbol {
    pub return_type: Option<String>,
    pub name: String,
    /// Parameter list exactly as written between the parentheses
    pub params: String,
}

impl RawSymbol {
    pub fn new(return_type: Option<&str>, name: &str, params: &str) -> Self {
        Self {
            return_type: return_type.map(|t| t.trim().to_string()),
            name: name.to_string(),
            params: params.to_string(),
        }
    }
}

/// Splits a raw parameter list on commas that are not nested inside
/// brackets, dropping empty pieces.
///
/// `<` and `>` nest only when they pair up across the whole list; otherwise
/// they are comparisons in default values and are ignored.
pub fn split_params(params: &str) -> Vec<&str> {
    split_nested(params, true).unwrap_or_else(|| split_nested(params, false).unwrap_or_default())
}

/// `None` when angle brackets are counted and left unbalanced
fn split_nested(params: &str, angle_brackets: bool) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut angles = 0usize;
    let mut start = 0;

    for (i, ch) in params.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '<' if angle_brackets => angles += 1,
            '>' if angle_brackets => {
                if angles == 0 {
                    return None;
                }
                angles -= 1;
            }
            ',' if depth == 0 && angles == 0 => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if angles != 0 {
        return None;
    }
    parts.push(params[start..].trim());

    Some(parts.into_iter().filter(|p| !p.is_empty()).collect())
}

/// Per-language extraction heuristics. Every method is a pure function of
/// the raw text; nothing is stripped before matching.
pub trait LanguageGrammar: Send + Sync {
    fn tag(&self) -> LanguageTag;
    fn file_extensions(&self) -> &[&'static str];

    /// Editor syntax names that map to this language
    fn syntax_names(&self) -> &[&'static str];

    fn functions(&self, text: &str) -> Vec<RawSymbol>;

    /// Non-function symbols: macros, typedefs, markup identifiers, keys
    fn important_words(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }

    /// Locally resolvable file names referenced by the text
    fn includes(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

pub struct LanguageRegistry {
    languages: HashMap<LanguageTag, Arc<dyn LanguageGrammar>>,
    extension_map: HashMap<String, LanguageTag>,
    syntax_map: HashMap<String, LanguageTag>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            languages: HashMap::new(),
            extension_map: HashMap::new(),
            syntax_map: HashMap::new(),
        };

        registry.register(Arc::new(c_family::CFamilyGrammar));
        registry.register(Arc::new(javascript::JavaScriptGrammar));
        registry.register(Arc::new(java::JavaGrammar));
        registry.register(Arc::new(python::PythonGrammar));
        registry.register(Arc::new(json::JsonGrammar));
        registry.register(Arc::new(html::HtmlGrammar));

        registry
    }

    pub fn register(&mut self, grammar: Arc<dyn LanguageGrammar>) {
        let tag = grammar.tag();
        for ext in grammar.file_extensions() {
            self.extension_map.insert(ext.to_ascii_lowercase(), tag);
        }
        for name in grammar.syntax_names() {
            self.syntax_map.insert(name.to_string(), tag);
        }
        self.languages.insert(tag, grammar);
    }

    pub fn get(&self, tag: LanguageTag) -> Option<Arc<dyn LanguageGrammar>> {
        self.languages.get(&tag).cloned()
    }

    pub fn tag_for_extension(&self, ext: &str) -> LanguageTag {
        self.extension_map
            .get(&ext.to_ascii_lowercase())
            .copied()
            .unwrap_or(LanguageTag::Unsupported)
    }

    pub fn tag_for_file(&self, path: &Path) -> LanguageTag {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.tag_for_extension(ext))
            .unwrap_or(LanguageTag::Unsupported)
    }

    /// Accepts either a bare syntax name (`C++`) or a syntax resource path
    /// (`Packages/C++/C++.sublime-syntax`).
    pub fn tag_for_syntax(&self, syntax: &str) -> LanguageTag {
        let name = Path::new(syntax)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(syntax);
        self.syntax_map
            .get(name)
            .copied()
            .unwrap_or(LanguageTag::Unsupported)
    }

    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extension_map.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_every_supported_tag() {
        let registry = LanguageRegistry::new();
        for tag in [
            LanguageTag::CLikeFamily,
            LanguageTag::JavaScriptLike,
            LanguageTag::Java,
            LanguageTag::Python,
            LanguageTag::Json,
            LanguageTag::Html,
        ] {
            let grammar = registry.get(tag).unwrap();
            assert_eq!(grammar.tag(), tag);
        }
        assert!(registry.get(LanguageTag::Unsupported).is_none());
    }

    #[test]
    fn test_tag_for_extension() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.tag_for_extension("c"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_extension("hpp"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_extension("mm"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_extension("CPP"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_extension("js"), LanguageTag::JavaScriptLike);
        assert_eq!(registry.tag_for_extension("java"), LanguageTag::Java);
        assert_eq!(registry.tag_for_extension("py"), LanguageTag::Python);
        assert_eq!(registry.tag_for_extension("json"), LanguageTag::Json);
        assert_eq!(registry.tag_for_extension("htm"), LanguageTag::Html);
        assert_eq!(registry.tag_for_extension("rs"), LanguageTag::Unsupported);
        assert_eq!(registry.tag_for_extension(""), LanguageTag::Unsupported);
    }

    #[test]
    fn test_tag_for_file() {
        let registry = LanguageRegistry::new();
        assert_eq!(
            registry.tag_for_file(Path::new("/src/vec.h")),
            LanguageTag::CLikeFamily
        );
        assert_eq!(
            registry.tag_for_file(Path::new("Makefile")),
            LanguageTag::Unsupported
        );
        assert_eq!(
            registry.tag_for_file(Path::new("README.md")),
            LanguageTag::Unsupported
        );
    }

    #[test]
    fn test_tag_for_syntax() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.tag_for_syntax("C"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_syntax("C++"), LanguageTag::CLikeFamily);
        assert_eq!(registry.tag_for_syntax("Objective-C"), LanguageTag::CLikeFamily);
        assert_eq!(
            registry.tag_for_syntax("Objective-C++"),
            LanguageTag::CLikeFamily
        );
        assert_eq!(
            registry.tag_for_syntax("Packages/C++/C++.sublime-syntax"),
            LanguageTag::CLikeFamily
        );
        assert_eq!(
            registry.tag_for_syntax("Packages/JavaScript/JavaScript.tmLanguage"),
            LanguageTag::JavaScriptLike
        );
        assert_eq!(registry.tag_for_syntax("Python"), LanguageTag::Python);
        assert_eq!(registry.tag_for_syntax("Markdown"), LanguageTag::Unsupported);
    }

    #[test]
    fn test_split_params_top_level() {
        assert_eq!(split_params("int a, int b"), vec!["int a", "int b"]);
        assert_eq!(
            split_params("std::map<int, char> m, void (*cb)(int, int)"),
            vec!["std::map<int, char> m", "void (*cb)(int, int)"]
        );
        assert_eq!(split_params("a,,b, "), vec!["a", "b"]);
        assert!(split_params("").is_empty());
        assert!(split_params("   ").is_empty());
    }

    #[test]
    fn test_split_params_comparison_in_default() {
        assert_eq!(split_params("a=1<2, b=3"), vec!["a=1<2", "b=3"]);
        assert_eq!(split_params("x=a>b, y=c"), vec!["x=a>b", "y=c"]);
        assert_eq!(
            split_params("Map<String, List<Item>> m, int n"),
            vec!["Map<String, List<Item>> m", "int n"]
        );
    }

    #[test]
    fn test_supported_extensions() {
        let registry = LanguageRegistry::new();
        let extensions = registry.supported_extensions();
        assert!(extensions.contains(&"cpp"));
        assert!(extensions.contains(&"py"));
        assert!(!extensions.contains(&"rs"));
    }

    #[test]
    fn test_language_tag_display() {
        assert_eq!(LanguageTag::CLikeFamily.to_string(), "c-family");
        assert!(!LanguageTag::Unsupported.is_supported());
        assert!(LanguageTag::Html.is_supported());
    }
}
