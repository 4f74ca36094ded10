pub mod completions;
pub mod extractor;
pub mod file_index;
pub mod include_resolver;
pub mod preload;
pub mod storage;
pub mod walker;
pub mod watcher;

pub use completions::{filter_prefix, rank_fuzzy, CompletionAggregator};
pub use extractor::{FileRecord, RenderOptions, SymbolEntry, SymbolExtractor, DIRECTIVE_MARKER};
pub use file_index::FileIndex;
pub use include_resolver::IncludeResolver;
pub use preload::PreloadSet;
pub use storage::{normalize_path, FsStorage, Storage};
pub use walker::FileWalker;
pub use watcher::{FileEvent, FileWatcher};
