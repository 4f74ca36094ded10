pub mod config;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod languages;

use once_cell::sync::Lazy;

pub use config::{Settings, SettingsSource};
pub use engine::{CompletionEngine, EditorHost};
pub use error::{IndexerError, Result};
pub use indexer::{
    FileEvent, FileIndex, FileRecord, FileWalker, FileWatcher, FsStorage, PreloadSet, Storage,
    SymbolEntry, SymbolExtractor,
};
pub use languages::{LanguageClassifier, LanguageGrammar, LanguageRegistry, LanguageTag, RawSymbol};

/// Global language registry instance (lazily initialized)
pub static REGISTRY: Lazy<LanguageRegistry> = Lazy::new(LanguageRegistry::new);
