use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::Settings;
use crate::languages::{split_params, LanguageGrammar, RawSymbol};

/// Marker of an in-file directive: `@autocomplete NAME insertion text`
pub const DIRECTIVE_MARKER: &str = "@autocomplete";

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?m){}[ \t]+(\w+)[ \t]+(.+)$", DIRECTIVE_MARKER))
        .expect("valid directive regex")
});
// Trailing identifier with optional array suffixes: `argv[]`, `grid[3][3]`
static LAST_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:\[\w*\])*$").expect("valid last word regex"));

/// Names that over-eager function patterns pick up from control flow
const RESERVED_NAMES: &[&str] = &["main", "if", "elif"];

/// One completion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    /// What the user sees and matches against; may carry a tab-separated hint
    pub display: String,
    /// Text inserted on acceptance, possibly with `${n:placeholder}` fields
    pub insertion: String,
}

impl SymbolEntry {
    pub fn new(display: impl Into<String>, insertion: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            insertion: insertion.into(),
        }
    }

    /// The display key without its hint
    pub fn trigger(&self) -> &str {
        self.display
            .split_once('\t')
            .map(|(t, _)| t)
            .unwrap_or(&self.display)
    }
}

/// The entries one file contributes, keyed by display key in insertion
/// order. Re-inserting a key replaces its text but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecord {
    entries: Vec<SymbolEntry>,
    positions: HashMap<String, usize>,
}

impl FileRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: SymbolEntry) {
        match self.positions.get(&entry.display) {
            Some(&pos) => self.entries[pos].insertion = entry.insertion,
            None => {
                self.positions.insert(entry.display.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, display: &str) -> Option<&str> {
        self.positions
            .get(display)
            .map(|&pos| self.entries[pos].insertion.as_str())
    }

    pub fn contains(&self, display: &str) -> bool {
        self.positions.contains_key(display)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_only_last_word: bool,
    pub annotate: bool,
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            show_only_last_word: settings.show_only_last_word,
            annotate: settings.annotate,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Turns raw file text into a [`FileRecord`].
pub struct SymbolExtractor {
    options: RenderOptions,
}

impl SymbolExtractor {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Builds the record for one file: directives first, then important
    /// words, then functions. Without a grammar only directives apply.
    pub fn extract(
        &self,
        grammar: Option<&dyn LanguageGrammar>,
        file_path: &Path,
        text: &str,
    ) -> FileRecord {
        let mut record = FileRecord::new();

        for (name, insertion) in directives(text) {
            record.insert(SymbolEntry::new(name, insertion));
        }

        let Some(grammar) = grammar else {
            return record;
        };

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for word in grammar.important_words(text) {
            record.insert(self.render_word(&word, &file_name));
        }

        for symbol in functions(grammar, text) {
            record.insert(self.render_function(&symbol));
        }

        record
    }

    pub fn render_word(&self, word: &str, file_name: &str) -> SymbolEntry {
        let display = if self.options.annotate && !file_name.is_empty() {
            format!("{}\t{}", word, file_name)
        } else {
            word.to_string()
        };
        SymbolEntry::new(display, word)
    }

    /// `add` with `int a, int b` becomes display `add\t(a, b)` and insertion
    /// `add(${1:int a}, ${2:int b})`, or `add(${1:a}, ${2:b})` when only the
    /// last word is shown.
    pub fn render_function(&self, symbol: &RawSymbol) -> SymbolEntry {
        let params = render_params(&symbol.params);

        let placeholders: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(i, (full, last))| {
                let text = if self.options.show_only_last_word { last } else { full };
                format!("${{{}:{}}}", i + 1, escape_snippet(text))
            })
            .collect();
        let insertion = format!("{}({})", symbol.name, placeholders.join(", "));

        let display = if self.options.annotate {
            let hints: Vec<&str> = params.iter().map(|(_, last)| last.as_str()).collect();
            format!("{}\t({})", symbol.name, hints.join(", "))
        } else {
            symbol.name.clone()
        };

        SymbolEntry::new(display, insertion)
    }
}

/// Function symbols of `text` minus control-flow false positives
pub fn functions(grammar: &dyn LanguageGrammar, text: &str) -> Vec<RawSymbol> {
    grammar
        .functions(text)
        .into_iter()
        .filter(|s| !is_false_positive(s))
        .collect()
}

pub fn is_false_positive(symbol: &RawSymbol) -> bool {
    RESERVED_NAMES.contains(&symbol.name.as_str()) || symbol.return_type.as_deref() == Some("return")
}

/// `(name, insertion)` pairs declared with the directive marker
pub fn directives(text: &str) -> Vec<(String, String)> {
    DIRECTIVE_RE
        .captures_iter(text)
        .map(|c| (c[1].to_string(), c[2].trim_end().to_string()))
        .filter(|(_, insertion)| !insertion.is_empty())
        .collect()
}

/// Trailing identifier of a parameter, or the parameter itself when it has
/// none
pub fn last_word(param: &str) -> &str {
    LAST_WORD_RE
        .find(param.trim_end())
        .map(|m| m.as_str())
        .unwrap_or(param)
}

/// `(full text without default, last word)` for every parameter
fn render_params(raw: &str) -> Vec<(String, String)> {
    let params = split_params(raw);
    // C `(void)` declares no parameters
    if params.len() == 1 && params[0] == "void" {
        return Vec::new();
    }

    params
        .into_iter()
        .filter_map(|p| {
            let full = p.split('=').next().unwrap_or(p).trim();
            if full.is_empty() {
                return None;
            }
            Some((full.to_string(), last_word(full).to_string()))
        })
        .collect()
}

fn escape_snippet(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('$', "\\$")
        .replace('}', "\\}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::c_family::CFamilyGrammar;
    use crate::languages::html::HtmlGrammar;
    use crate::languages::python::PythonGrammar;

    fn extractor(show_only_last_word: bool) -> SymbolExtractor {
        SymbolExtractor::new(RenderOptions {
            show_only_last_word,
            annotate: true,
        })
    }

    #[test]
    fn test_add_last_word() {
        let record = extractor(true).extract(
            Some(&CFamilyGrammar),
            Path::new("/w/math.c"),
            "int add(int a, int b) { return a+b; }",
        );
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("add\t(a, b)"), Some("add(${1:a}, ${2:b})"));
    }

    #[test]
    fn test_add_full_params() {
        let record = extractor(false).extract(
            Some(&CFamilyGrammar),
            Path::new("/w/math.c"),
            "int add(int a, int b) { return a+b; }",
        );
        assert_eq!(
            record.get("add\t(a, b)"),
            Some("add(${1:int a}, ${2:int b})")
        );
    }

    #[test]
    fn test_define_annotated_with_file() {
        let record = extractor(false).extract(
            Some(&CFamilyGrammar),
            Path::new("/w/limits.h"),
            "#define MAX_SIZE 100",
        );
        let entries: Vec<_> = record.iter().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display, "MAX_SIZE\tlimits.h");
        assert_eq!(entries[0].trigger(), "MAX_SIZE");
        assert_eq!(entries[0].insertion, "MAX_SIZE");
    }

    #[test]
    fn test_no_annotation() {
        let extractor = SymbolExtractor::new(RenderOptions {
            show_only_last_word: true,
            annotate: false,
        });
        let record = extractor.extract(
            Some(&CFamilyGrammar),
            Path::new("/w/x.h"),
            "#define MAX_SIZE 100\nint add(int a, int b);",
        );
        assert_eq!(record.get("MAX_SIZE"), Some("MAX_SIZE"));
        assert_eq!(record.get("add"), Some("add(${1:a}, ${2:b})"));
    }

    #[test]
    fn test_order_directives_words_functions() {
        let text = "int area(int w, int h);\n#define PI 3\n// @autocomplete banner /* generated */\n";
        let record = extractor(true).extract(Some(&CFamilyGrammar), Path::new("/w/g.c"), text);
        let displays: Vec<&str> = record.iter().map(|e| e.display.as_str()).collect();
        assert_eq!(displays, vec!["banner", "PI\tg.c", "area\t(w, h)"]);
        assert_eq!(record.get("banner"), Some("/* generated */"));
    }

    #[test]
    fn test_reserved_names_filtered() {
        let text = "int main(int argc, char **argv) {\n  else if (x) { return check(x); }\n}\n";
        let record = extractor(true).extract(Some(&CFamilyGrammar), Path::new("/w/m.c"), text);
        assert!(record.is_empty());
    }

    #[test]
    fn test_html_words() {
        let record = extractor(true).extract(
            Some(&HtmlGrammar),
            Path::new("/w/index.html"),
            r#"<div class="a b" id="x"></div>"#,
        );
        let triggers: Vec<&str> = record.iter().map(|e| e.trigger()).collect();
        assert_eq!(triggers, vec!["a", "b", "x"]);
    }

    #[test]
    fn test_python_self_and_dunder() {
        let text = "class P:\n    def __init__(self, x):\n        pass\n    def run(self, x):\n        pass\n";
        let record = extractor(true).extract(Some(&PythonGrammar), Path::new("/w/p.py"), text);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("run\t(x)"), Some("run(${1:x})"));
    }

    #[test]
    fn test_without_grammar_only_directives() {
        let text = "@autocomplete hello printf(\"hello\")\nint add(int a, int b);";
        let record = extractor(true).extract(None, Path::new("/w/notes.txt"), text);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("hello"), Some("printf(\"hello\")"));
    }

    #[test]
    fn test_duplicate_display_keeps_position() {
        let mut record = FileRecord::new();
        record.insert(SymbolEntry::new("a", "1"));
        record.insert(SymbolEntry::new("b", "2"));
        record.insert(SymbolEntry::new("a", "3"));

        let entries: Vec<_> = record.iter().cloned().collect();
        assert_eq!(
            entries,
            vec![SymbolEntry::new("a", "3"), SymbolEntry::new("b", "2")]
        );
    }

    #[test]
    fn test_render_defaults_and_arrays() {
        let ex = extractor(true);
        let entry = ex.render_function(&RawSymbol::new(
            Some("void"),
            "fill",
            "int grid[3][3], char *argv[], int n = 4",
        ));
        assert_eq!(entry.display, "fill\t(grid[3][3], argv[], n)");
        assert_eq!(entry.insertion, "fill(${1:grid[3][3]}, ${2:argv[]}, ${3:n})");
    }

    #[test]
    fn test_render_void_and_empty() {
        let ex = extractor(false);
        assert_eq!(
            ex.render_function(&RawSymbol::new(Some("int"), "tick", "void"))
                .insertion,
            "tick()"
        );
        assert_eq!(
            ex.render_function(&RawSymbol::new(None, "noop", "")).display,
            "noop\t()"
        );
    }

    #[test]
    fn test_render_escapes_snippet_characters() {
        let entry = extractor(false).render_function(&RawSymbol::new(
            None,
            "tpl",
            "price$, fn}",
        ));
        assert_eq!(entry.insertion, "tpl(${1:price\\$}, ${2:fn\\}})");
    }

    #[test]
    fn test_last_word_fallback() {
        assert_eq!(last_word("const char *name"), "name");
        assert_eq!(last_word("int values[]"), "values[]");
        assert_eq!(last_word("..."), "...");
        assert_eq!(last_word("**"), "**");
    }

    #[test]
    fn test_directives() {
        let text = "# @autocomplete greet Hello, ${1:name}!  \n@autocomplete empty   \n";
        assert_eq!(
            directives(text),
            vec![("greet".to_string(), "Hello, ${1:name}!".to_string())]
        );
    }

    #[test]
    fn test_is_false_positive() {
        assert!(is_false_positive(&RawSymbol::new(None, "main", "")));
        assert!(is_false_positive(&RawSymbol::new(None, "elif", "x")));
        assert!(is_false_positive(&RawSymbol::new(Some("return"), "f", "x")));
        assert!(!is_false_positive(&RawSymbol::new(Some("int"), "f", "x")));
    }
}
