use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::{Settings, SETTINGS_FILENAME};
use crate::engine::CompletionEngine;
use crate::error::{IndexerError, Result};
use crate::indexer::extractor::{directives, functions};
use crate::indexer::{filter_prefix, rank_fuzzy, FileEvent, FileWalker, FileWatcher, SymbolEntry};
use crate::languages::{LanguageTag, RawSymbol};
use crate::REGISTRY;

#[derive(Parser)]
#[command(name = "symbol-complete")]
#[command(about = "Symbol index and completion candidates for source files")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Completions available while editing a file
    symbol-complete complete src/main.c

    # Only candidates starting with a prefix
    symbol-complete complete src/main.c --prefix list_

    # Symbols extracted from a single file
    symbol-complete symbols src/list.h --format json

    # Index a directory and keep it current
    symbol-complete index ./src --watch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to .symbol-complete.yml when present)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log index decisions
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the completion list seen while editing a file
    Complete {
        /// File being edited
        file: PathBuf,

        /// Editor syntax name, when the extension is not enough
        #[arg(long)]
        syntax: Option<String>,

        /// Keep only candidates starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Rank candidates by similarity to the prefix instead
        #[arg(long)]
        fuzzy: bool,

        /// Minimum similarity for fuzzy ranking (0.0 - 1.0)
        #[arg(long, default_value = "0.7")]
        fuzzy_threshold: f64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the raw symbols extracted from a file
    Symbols {
        file: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Index every supported file under a directory
    Index {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Watch for file changes and update the index
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Serialize)]
struct SymbolsReport {
    file: PathBuf,
    language: LanguageTag,
    functions: Vec<RawSymbol>,
    important_words: Vec<String>,
    includes: Vec<String>,
    directives: Vec<(String, String)>,
}

/// Explicit path first, then the settings file in the working directory
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = path {
        return Settings::from_file(path);
    }
    let default = Path::new(SETTINGS_FILENAME);
    if default.is_file() {
        return Settings::from_file(default);
    }
    Ok(Settings::default())
}

fn read_source(file: &Path) -> Result<String> {
    if !file.is_file() {
        return Err(IndexerError::FileNotFound(file.display().to_string()));
    }
    let bytes = fs::read(file)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn language_of(file: &Path, syntax: Option<&str>) -> LanguageTag {
    match syntax.map(|s| REGISTRY.tag_for_syntax(s)) {
        Some(tag) if tag.is_supported() => tag,
        _ => REGISTRY.tag_for_file(file),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn complete(
    settings: Settings,
    file: &Path,
    syntax: Option<&str>,
    prefix: Option<&str>,
    fuzzy: bool,
    fuzzy_threshold: f64,
    format: &str,
) -> Result<()> {
    if !language_of(file, syntax).is_supported() {
        return Err(IndexerError::UnsupportedLanguage(file.display().to_string()));
    }
    let text = read_source(file)?;

    let mut engine = CompletionEngine::new(settings);
    engine.on_file_activated(file, syntax, &text);
    let entries = engine.query_completions(file, syntax);

    let selected: Vec<&SymbolEntry> = match prefix {
        Some(prefix) if fuzzy => rank_fuzzy(entries, prefix, fuzzy_threshold)
            .into_iter()
            .map(|(entry, _)| entry)
            .collect(),
        Some(prefix) => filter_prefix(entries, prefix),
        None => entries.iter().collect(),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&selected).unwrap_or_default());
        return Ok(());
    }

    if selected.is_empty() {
        println!("No completions");
        return Ok(());
    }
    for entry in selected {
        let hint = entry.display.split_once('\t').map(|(_, h)| h).unwrap_or("");
        println!("{:<32} {:<24} {}", entry.trigger(), hint, entry.insertion);
    }
    Ok(())
}

pub fn show_symbols(file: &Path, format: &str) -> Result<()> {
    let text = read_source(file)?;
    let language = REGISTRY.tag_for_file(file);
    let grammar = REGISTRY
        .get(language)
        .ok_or_else(|| IndexerError::UnsupportedLanguage(file.display().to_string()))?;

    let report = SymbolsReport {
        file: file.to_path_buf(),
        language,
        functions: functions(&*grammar, &text),
        important_words: grammar.important_words(&text),
        includes: grammar.includes(&text),
        directives: directives(&text),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        return Ok(());
    }

    println!("{} ({})", report.file.display(), report.language);
    if !report.functions.is_empty() {
        println!("\n  Functions:");
        for f in &report.functions {
            match &f.return_type {
                Some(ret) => println!("    {} {}({})", ret, f.name, f.params),
                None => println!("    {}({})", f.name, f.params),
            }
        }
    }
    if !report.important_words.is_empty() {
        println!("\n  Words:");
        for word in &report.important_words {
            println!("    {}", word);
        }
    }
    if !report.includes.is_empty() {
        println!("\n  Includes:");
        for include in &report.includes {
            println!("    {}", include);
        }
    }
    if !report.directives.is_empty() {
        println!("\n  Directives:");
        for (name, insertion) in &report.directives {
            println!("    {} -> {}", name, insertion);
        }
    }
    Ok(())
}

pub fn index_directory(settings: Settings, path: &Path, watch: bool) -> Result<()> {
    let walker = FileWalker::new(&REGISTRY);
    let files = walker.walk(path)?;
    println!("Found {} files to index", files.len());

    let mut engine = CompletionEngine::new(settings);
    for file in &files {
        match read_source(file) {
            Ok(text) => engine.on_file_activated(file, None, &text),
            Err(e) => eprintln!("Error reading {}: {}", file.display(), e),
        }
    }

    for file in engine.index().files() {
        let count = engine.index().record(file).map(|r| r.len()).unwrap_or(0);
        println!("  {:>5}  {}", count, file.display());
    }
    println!(
        "Indexed {} files, {} completions",
        engine.index().len(),
        engine.get_completions().len()
    );

    if watch {
        println!("Watching for changes...");
        let watcher = FileWatcher::new(path)?;

        while let Some(events) = watcher.recv() {
            for event in events {
                match event {
                    FileEvent::Modified(file_path) => {
                        if !walker.is_supported(&file_path) {
                            continue;
                        }
                        if let Ok(text) = read_source(&file_path) {
                            engine.on_file_saved(&file_path, None, &text);
                            println!(
                                "Updated {}: {} completions",
                                file_path.display(),
                                engine.get_completions().len()
                            );
                        }
                    }
                    FileEvent::Deleted(file_path) => {
                        engine.on_file_closed(&file_path, None, "");
                        println!("Removed {}", file_path.display());
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_settings_explicit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(&path, "show_only_last_word: true\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert!(settings.show_only_last_word);
    }

    #[test]
    fn test_load_settings_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_settings(Some(&dir.path().join("none.yml"))).is_err());
    }

    #[test]
    fn test_read_source_missing() {
        let err = read_source(Path::new("/definitely/not/here.c")).unwrap_err();
        assert!(matches!(err, IndexerError::FileNotFound(_)));
    }

    #[test]
    fn test_language_of_prefers_known_syntax() {
        assert_eq!(
            language_of(Path::new("x.txt"), Some("C++")),
            LanguageTag::CLikeFamily
        );
        assert_eq!(
            language_of(Path::new("x.py"), Some("Plain Text")),
            LanguageTag::Python
        );
        assert_eq!(language_of(Path::new("x.txt"), None), LanguageTag::Unsupported);
    }

    #[test]
    fn test_complete_unsupported() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();

        let err = complete(Settings::default(), &file, None, None, false, 0.7, "text").unwrap_err();
        assert!(matches!(err, IndexerError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_complete_and_index_run() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.c");
        fs::write(&file, "#include \"list.h\"\nint run(int n);").unwrap();
        fs::write(dir.path().join("list.h"), "int push(int v);").unwrap();

        complete(Settings::default(), &file, None, Some("pu"), false, 0.7, "json").unwrap();
        show_symbols(&file, "text").unwrap();
        index_directory(Settings::default(), dir.path(), false).unwrap();
    }
}
