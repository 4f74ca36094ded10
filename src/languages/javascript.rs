use once_cell::sync::Lazy;
use regex::Regex;

use super::{LanguageGrammar, LanguageTag, RawSymbol};

pub struct JavaScriptGrammar;

// `name = function(params)`
static ASSIGNED_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s+=\s+function\s*\(([^)]*)\)").expect("valid assigned function regex")
});
// `function name(params)`
static DECLARED_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"function\s+(\w+)\s*\(([^)]*)\)").expect("valid declared function regex")
});

impl LanguageGrammar for JavaScriptGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::JavaScriptLike
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["JavaScript", "JavaScript (Babel)", "JSX"]
    }

    fn functions(&self, text: &str) -> Vec<RawSymbol> {
        let assigned = ASSIGNED_FUNCTION_RE
            .captures_iter(text)
            .map(|c| RawSymbol::new(None, &c[1], &c[2]));
        let declared = DECLARED_FUNCTION_RE
            .captures_iter(text)
            .map(|c| RawSymbol::new(None, &c[1], &c[2]));
        assigned.chain(declared).collect()
    }
}
