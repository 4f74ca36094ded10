//! Editor-facing entry points.
//!
//! The engine turns editor events into index mutations. Events are handled
//! one at a time to completion; nothing here is shared across threads.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::indexer::extractor::SymbolEntry;
use crate::indexer::file_index::FileIndex;
use crate::indexer::preload::PreloadSet;
use crate::indexer::storage::{FsStorage, Storage};
use crate::languages::LanguageTag;

/// What the engine needs to know about the editor's current view
pub trait EditorHost {
    fn active_file_path(&self) -> Option<PathBuf>;

    /// Live, possibly unsaved, contents of an open file
    fn buffer_text(&self, path: &Path) -> Option<String>;

    fn syntax_name(&self, _path: &Path) -> Option<String> {
        None
    }
}

pub struct CompletionEngine<S: Storage = FsStorage> {
    settings: Settings,
    index: FileIndex<S>,
    preload_resolved: bool,
}

impl CompletionEngine<FsStorage> {
    pub fn new(settings: Settings) -> Self {
        Self::with_storage(settings, FsStorage)
    }
}

impl<S: Storage> CompletionEngine<S> {
    pub fn with_storage(settings: Settings, storage: S) -> Self {
        let index = FileIndex::with_storage(&settings, storage);
        Self {
            settings,
            index,
            preload_resolved: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn index(&self) -> &FileIndex<S> {
        &self.index
    }

    /// Replaces the settings. The previous preload files are unpinned and
    /// unloaded, the remaining files are reindexed from storage with the new
    /// rendering, and the new preload set is resolved on the next event.
    pub fn reload_settings(&mut self, settings: Settings) {
        let old = self.index.take_preload();
        for path in old.iter() {
            self.index.unload(path, None);
        }
        self.index.configure(&settings);

        let files: Vec<PathBuf> = self.index.files().cloned().collect();
        for path in &files {
            self.index.load(path, true, None);
        }
        self.settings = settings;
        self.preload_resolved = false;
        info!("Settings reloaded");
    }

    /// A file gained focus: index it unless already indexed
    pub fn on_file_activated(&mut self, path: &Path, syntax: Option<&str>, text: &str) {
        if !self.accepts(path, syntax) {
            return;
        }
        self.ensure_preloaded();
        self.index.load(path, false, Some(text));
    }

    /// A file was saved: reindex it from its current contents
    pub fn on_file_saved(&mut self, path: &Path, syntax: Option<&str>, text: &str) {
        if !self.accepts(path, syntax) {
            return;
        }
        self.ensure_preloaded();
        self.index.load(path, true, Some(text));
    }

    /// A file was closed: drop it and what it pulled in
    pub fn on_file_closed(&mut self, path: &Path, syntax: Option<&str>, text: &str) {
        if !self.accepts(path, syntax) {
            return;
        }
        self.ensure_preloaded();
        self.index.unload(path, Some(text));
    }

    /// Activates whatever file the host currently shows. Views without a
    /// file on disk are ignored.
    pub fn on_host_activated(&mut self, host: &dyn EditorHost) {
        let Some(path) = host.active_file_path() else {
            return;
        };
        let Some(text) = host.buffer_text(&path) else {
            return;
        };
        let syntax = host.syntax_name(&path);
        self.on_file_activated(&path, syntax.as_deref(), &text);
    }

    /// Completions offered while editing `path`; empty for files the engine
    /// does not handle.
    pub fn query_completions(&mut self, path: &Path, syntax: Option<&str>) -> &[SymbolEntry] {
        if !self.accepts(path, syntax) {
            return &[];
        }
        self.ensure_preloaded();
        self.index.completions()
    }

    pub fn get_completions(&self) -> &[SymbolEntry] {
        self.index.completions()
    }

    fn accepts(&mut self, path: &Path, syntax: Option<&str>) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let tag = match syntax {
            Some(syntax) => self.index.classify_syntax(path, syntax),
            None => self.index.classify(path),
        };
        if tag == LanguageTag::Unsupported {
            debug!("Ignoring unsupported file: {}", path.display());
            return false;
        }
        true
    }

    fn ensure_preloaded(&mut self) {
        if self.preload_resolved {
            return;
        }
        self.preload_resolved = true;

        let preload = PreloadSet::resolve(
            self.index.storage(),
            &self.settings.preload_files,
            &self.settings.exclude_files,
        );
        info!("Preloading {} files", preload.len());
        self.index.set_preload(preload);
    }
}
