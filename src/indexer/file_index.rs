//! Per-file symbol ownership.
//!
//! Every indexed file owns exactly one [`FileRecord`], keyed by its
//! normalized absolute path. Loading a file replaces its record wholesale and
//! then follows its includes; unloading removes the record and cascades to
//! the files it includes, except preloaded ones. The merged completion list
//! is rebuilt after every public mutation.
//!
//! Missing files are a normal transient state (editor close races, generated
//! files) and are skipped without surfacing an error.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::indexer::completions::CompletionAggregator;
use crate::indexer::extractor::{FileRecord, RenderOptions, SymbolEntry, SymbolExtractor};
use crate::indexer::include_resolver::IncludeResolver;
use crate::indexer::preload::PreloadSet;
use crate::indexer::storage::{normalize_path, FsStorage, Storage};
use crate::languages::{LanguageClassifier, LanguageTag};
use crate::REGISTRY;

pub struct FileIndex<S: Storage = FsStorage> {
    storage: S,
    classifier: LanguageClassifier,
    extractor: SymbolExtractor,
    resolver: IncludeResolver,
    records: HashMap<PathBuf, FileRecord>,
    /// Index iteration order; a reindexed file keeps its slot
    order: Vec<PathBuf>,
    completions: CompletionAggregator,
    preload: PreloadSet,
    max_include_depth: usize,
}

impl FileIndex<FsStorage> {
    pub fn new(settings: &Settings) -> Self {
        Self::with_storage(settings, FsStorage)
    }
}

impl<S: Storage> FileIndex<S> {
    pub fn with_storage(settings: &Settings, storage: S) -> Self {
        Self {
            storage,
            classifier: LanguageClassifier::new(),
            extractor: SymbolExtractor::new(RenderOptions::from(settings)),
            resolver: IncludeResolver::new(),
            records: HashMap::new(),
            order: Vec::new(),
            completions: CompletionAggregator::new(),
            preload: PreloadSet::new(),
            max_include_depth: settings.max_include_depth,
        }
    }

    /// Applies rendering and depth settings to subsequent loads. Records
    /// already in the index keep their rendering until reindexed.
    pub fn configure(&mut self, settings: &Settings) {
        self.extractor.set_options(RenderOptions::from(settings));
        self.max_include_depth = settings.max_include_depth;
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Indexes `path` and, transitively, the files it includes.
    ///
    /// Without `override_existing` an already indexed file is left alone;
    /// this is also what stops include cycles. `text` stands in for the
    /// stored contents, e.g. an unsaved editor buffer.
    pub fn load(&mut self, path: &Path, override_existing: bool, text: Option<&str>) {
        let mut visited = HashSet::new();
        self.load_file(&normalize_path(path), override_existing, text, &mut visited, 0);
        self.rebuild();
    }

    /// Removes `path` and, transitively, the files it includes. Preloaded
    /// files are never removed.
    ///
    /// The cascade does not count references: an include shared with a
    /// still-open file goes too, and comes back when that file is next
    /// loaded.
    pub fn unload(&mut self, path: &Path, text: Option<&str>) {
        self.unload_file(&normalize_path(path), text, 0);
        self.rebuild();
    }

    fn load_file(
        &mut self,
        path: &Path,
        override_existing: bool,
        text: Option<&str>,
        visited: &mut HashSet<PathBuf>,
        depth: usize,
    ) {
        if !override_existing && self.records.contains_key(path) {
            debug!("Already indexed, skipping: {}", path.display());
            return;
        }
        // an overriding load bypasses the check above, so cycles need this
        if !visited.insert(path.to_path_buf()) {
            debug!("Include cycle at {}", path.display());
            return;
        }
        if depth > self.max_include_depth {
            warn!(
                "Include depth limit {} reached at {}",
                self.max_include_depth,
                path.display()
            );
            return;
        }

        let text = match text {
            Some(text) => text.to_string(),
            None => match self.read(path) {
                Some(text) => text,
                None => return,
            },
        };

        let tag = self.classifier.classify_path(&REGISTRY, path);
        if !tag.is_supported() {
            debug!("Unsupported language, indexing directives only: {}", path.display());
        }
        let grammar = REGISTRY.get(tag);

        let record = self.extractor.extract(grammar.as_deref(), path, &text);
        debug!("Indexed {} ({} entries, {})", path.display(), record.len(), tag);
        self.insert_record(path.to_path_buf(), record);

        for include in self.resolver.resolve(grammar.as_deref(), path, &text) {
            self.load_file(&include, false, None, visited, depth + 1);
        }
    }

    fn unload_file(&mut self, path: &Path, text: Option<&str>, depth: usize) {
        if self.preload.contains(path) {
            debug!("Preloaded, keeping: {}", path.display());
            return;
        }
        if !self.remove_record(path) {
            return;
        }
        debug!("Removed {}", path.display());

        if depth >= self.max_include_depth {
            warn!(
                "Include depth limit {} reached while unloading {}",
                self.max_include_depth,
                path.display()
            );
            return;
        }
        // without the file its includes cannot be known
        if !self.storage.exists(path) {
            debug!("File gone, not cascading: {}", path.display());
            return;
        }

        let text = match text {
            Some(text) => text.to_string(),
            None => match self.read(path) {
                Some(text) => text,
                None => return,
            },
        };

        let tag = self.classifier.classify_path(&REGISTRY, path);
        let grammar = REGISTRY.get(tag);
        for include in self.resolver.resolve(grammar.as_deref(), path, &text) {
            self.unload_file(&include, None, depth + 1);
        }
    }

    fn read(&self, path: &Path) -> Option<String> {
        match self.storage.read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File not found, skipping: {}", path.display());
                None
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn insert_record(&mut self, path: PathBuf, record: FileRecord) {
        if !self.records.contains_key(&path) {
            self.order.push(path.clone());
        }
        self.records.insert(path, record);
    }

    fn remove_record(&mut self, path: &Path) -> bool {
        if self.records.remove(path).is_none() {
            return false;
        }
        self.order.retain(|p| p != path);
        true
    }

    fn rebuild(&mut self) {
        let records = &self.records;
        self.completions
            .rebuild(self.order.iter().filter_map(|p| records.get(p)));
        debug!("Completions rebuilt: {} entries", self.completions.len());
    }

    /// Pins `preload` and indexes every file in it
    pub fn set_preload(&mut self, preload: PreloadSet) {
        let paths: Vec<PathBuf> = preload.iter().cloned().collect();
        self.preload = preload;
        for path in paths {
            self.load(&path, false, None);
        }
    }

    /// Unpins the preload set, leaving its files indexed
    pub fn take_preload(&mut self) -> PreloadSet {
        std::mem::take(&mut self.preload)
    }

    pub fn preload(&self) -> &PreloadSet {
        &self.preload
    }

    pub fn is_preloaded(&self, path: &Path) -> bool {
        self.preload.contains(&normalize_path(path))
    }

    pub fn classify(&mut self, path: &Path) -> LanguageTag {
        self.classifier.classify_path(&REGISTRY, &normalize_path(path))
    }

    /// Classifies `path` by an editor syntax name. An indexed file whose
    /// language changes is reindexed under the new language.
    pub fn classify_syntax(&mut self, path: &Path, syntax: &str) -> LanguageTag {
        let path = normalize_path(path);
        let before = self.classifier.cached(&path);
        let tag = self.classifier.classify_syntax(&REGISTRY, &path, syntax);
        if before.is_some_and(|b| b != tag) && self.records.contains_key(&path) {
            debug!("Language of {} is now {}, reindexing", path.display(), tag);
            self.load(&path, true, None);
        }
        tag
    }

    pub fn completions(&self) -> &[SymbolEntry] {
        self.completions.entries()
    }

    pub fn record(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(&normalize_path(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.records.contains_key(&normalize_path(path))
    }

    /// Indexed files in iteration order
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
