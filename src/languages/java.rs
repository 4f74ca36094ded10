use once_cell::sync::Lazy;
use regex::Regex;

use super::{LanguageGrammar, LanguageTag, RawSymbol};

pub struct JavaGrammar;

// `(public|private|protected) [modifiers] returnType name(params)`; the last
// word before the name is the return type
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:protected|private|public)\s+(\w+\s+)*(\w+)\(([^)]*)\)")
        .expect("valid method regex")
});

impl LanguageGrammar for JavaGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::Java
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["java"]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["Java"]
    }

    fn functions(&self, text: &str) -> Vec<RawSymbol> {
        METHOD_RE
            .captures_iter(text)
            .map(|caps| {
                let return_type = caps.get(1).map(|m| m.as_str());
                RawSymbol::new(return_type, &caps[2], &caps[3])
            })
            .collect()
    }
}
