use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};

use crate::error::{IndexerError, Result};

/// A debounced file-system change, mapped onto editor events: a modified
/// file is treated as saved, a vanished one as closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Modified(PathBuf),
    Deleted(PathBuf),
}

pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    receiver: Receiver<std::result::Result<Vec<DebouncedEvent>, notify::Error>>,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)
            .map_err(|e| IndexerError::Watcher(e.to_string()))?;

        debouncer
            .watcher()
            .watch(path, RecursiveMode::Recursive)
            .map_err(|e| IndexerError::Watcher(e.to_string()))?;

        Ok(Self {
            _debouncer: debouncer,
            receiver: rx,
        })
    }

    /// Blocks for the next batch. `None` once the watcher is gone.
    pub fn recv(&self) -> Option<Vec<FileEvent>> {
        match self.receiver.recv() {
            Ok(Ok(events)) => Some(classify(events.into_iter().map(|e| e.path))),
            Ok(Err(e)) => {
                tracing::warn!("Watch error: {}", e);
                Some(Vec::new())
            }
            Err(_) => None,
        }
    }
}

fn classify(paths: impl Iterator<Item = PathBuf>) -> Vec<FileEvent> {
    paths
        .filter_map(|path| {
            if path.is_file() {
                Some(FileEvent::Modified(path))
            } else if !path.exists() {
                Some(FileEvent::Deleted(path))
            } else {
                None
            }
        })
        .collect()
}
