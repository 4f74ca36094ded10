use once_cell::sync::Lazy;
use regex::Regex;

use super::{LanguageGrammar, LanguageTag, RawSymbol};

pub struct HtmlGrammar;

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(class|id)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
});

impl LanguageGrammar for HtmlGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::Html
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["html", "htm", "xhtml"]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["HTML"]
    }

    fn functions(&self, _text: &str) -> Vec<RawSymbol> {
        Vec::new()
    }

    /// Every class token and every id, in document order
    fn important_words(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        for caps in ATTRIBUTE_RE.captures_iter(text) {
            let value = &caps[2];
            if &caps[1] == "class" {
                words.extend(value.split_whitespace().map(str::to_string));
            } else if !value.trim().is_empty() {
                words.push(value.trim().to_string());
            }
        }
        words
    }
}
