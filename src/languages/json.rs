use once_cell::sync::Lazy;
use regex::Regex;

use super::{LanguageGrammar, LanguageTag, RawSymbol};

pub struct JsonGrammar;

// Any quoted string made of a single word, keys and values alike
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(\w+)""#).expect("valid word regex"));

impl LanguageGrammar for JsonGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::Json
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["JSON"]
    }

    fn functions(&self, _text: &str) -> Vec<RawSymbol> {
        Vec::new()
    }

    fn important_words(&self, text: &str) -> Vec<String> {
        WORD_RE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect()
    }
}
