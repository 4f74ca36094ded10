use once_cell::sync::Lazy;
use regex::Regex;

use super::{split_params, LanguageGrammar, LanguageTag, RawSymbol};

pub struct PythonGrammar;

// `def name(params):` with an optional `-> annotation`
static DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"def\s+(\w+)\s*\(([^)]*)\)\s*(?:->\s*([^:]+?)\s*)?:").expect("valid def regex")
});

impl LanguageGrammar for PythonGrammar {
    fn tag(&self) -> LanguageTag {
        LanguageTag::Python
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["py", "pyw", "pyi"]
    }

    fn syntax_names(&self) -> &[&'static str] {
        &["Python", "Python 3"]
    }

    fn functions(&self, text: &str) -> Vec<RawSymbol> {
        DEF_RE
            .captures_iter(text)
            .filter(|caps| !is_dunder(&caps[1]))
            .map(|caps| {
                let return_type = caps.get(3).map(|m| m.as_str());
                RawSymbol::new(return_type, &caps[1], &strip_receiver(&caps[2]))
            })
            .collect()
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Drops a leading `self`/`cls`, the bare `*` and `/` markers and the type
/// annotation of every parameter.
fn strip_receiver(params: &str) -> String {
    let mut parts: Vec<String> = split_params(params)
        .into_iter()
        .filter(|p| *p != "*" && *p != "/")
        .map(|p| match p.split_once(':') {
            Some((name, rest)) => match rest.split_once('=') {
                Some((_, default)) => format!("{}={}", name.trim(), default.trim()),
                None => name.trim().to_string(),
            },
            None => p.to_string(),
        })
        .collect();

    if parts.first().is_some_and(|first| first == "self" || first == "cls") {
        parts.remove(0);
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dunder_dropped() {
        assert!(PythonGrammar
            .functions("class A:\n    def __init__(self, x):\n        pass\n")
            .is_empty());
    }

    #[test]
    fn test_self_dropped() {
        let symbols = PythonGrammar.functions("    def run(self, x):\n        return x\n");
        assert_eq!(symbols, vec![RawSymbol::new(None, "run", "x")]);
    }

    #[test]
    fn test_cls_dropped() {
        let symbols = PythonGrammar.functions("    def build(cls, name, size=3):\n");
        assert_eq!(symbols[0].params, "name, size=3");
    }

    #[test]
    fn test_self_only_in_first_position() {
        let symbols = PythonGrammar.functions("def pair(a, self):\n");
        assert_eq!(symbols[0].params, "a, self");
    }

    #[test]
    fn test_annotations() {
        let symbols = PythonGrammar
            .functions("def scale(self, factor: float, *, inplace: bool = False) -> Matrix:\n");
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "scale");
        assert_eq!(symbols[0].return_type.as_deref(), Some("Matrix"));
        assert_eq!(symbols[0].params, "factor, inplace=False");
    }

    #[test]
    fn test_comparison_in_default() {
        let symbols = PythonGrammar.functions("def clip(a=1<2, b=3):\n");
        assert_eq!(symbols[0].params, "a=1<2, b=3");
        assert_eq!(split_params(&symbols[0].params), vec!["a=1<2", "b=3"]);
    }

    #[test]
    fn test_is_dunder() {
        assert!(is_dunder("__init__"));
        assert!(is_dunder("__repr__"));
        assert!(!is_dunder("_private"));
        assert!(!is_dunder("__mangled"));
        assert!(!is_dunder("____"));
    }
}
