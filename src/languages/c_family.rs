use once_cell::sync::Lazy;
use regex::Regex;

use super::{LanguageGrammar, LanguageTag, RawSymbol};

/// C, C++, Objective-C and Objective-C++
pub struct CFamilyGrammar;

// `returnType [modifiers] [*] [Class::]name(params)`
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\**\s+(?:\w+\s+)*\**\s*(?:\w+::)?(\w+)\s*\(([^)]*)\)")
        .expect("valid function regex")
});
static DEFINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s*define\s+(\w+)").expect("valid define regex"));
static TYPEDEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"typedef(?:\s+\w+)+\s+(\w+)\s*;").expect("valid typedef regex")
});
// Quoted form only, `<...>` includes are not locally resolvable
static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"#\s*include\s*"([^"]+)""#).expect("valid include regex"));

impl LanguageGrammar for CFamilyGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::CLikeFamily
    }

    fn file_extensions(&self) -> &[&'static str] {
        &[
            "c", "h", "cc", "cpp", "cxx", "c++", "hh", "hpp", "hxx", "ino", "m", "mm",
        ]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["C", "C++", "Objective-C", "Objective-C++"]
    }

    fn functions(&self, text: &str) -> Vec<RawSymbol> {
        FUNCTION_RE
            .captures_iter(text)
            .map(|caps| RawSymbol::new(Some(&caps[1]), &caps[2], &caps[3]))
            .collect()
    }

    fn important_words(&self, text: &str) -> Vec<String> {
        let defines = DEFINE_RE.captures_iter(text).map(|c| c[1].to_string());
        let typedefs = TYPEDEF_RE.captures_iter(text).map(|c| c[1].to_string());
        defines.chain(typedefs).collect()
    }

    fn includes(&self, text: &str) -> Vec<String> {
        INCLUDE_RE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect()
    }
}
