//! File system watching for the document, config and list sources
//!
//! Uses the `notify` crate with a short debounce to coalesce the bursts
//! of events editors produce on save, then forwards one `Trigger` per
//! affected target over a channel.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};

use crate::error::Result;
use crate::session::Trigger;

/// Coalescing window for raw file system events
const FS_COALESCE: Duration = Duration::from_millis(50);

/// The files a session cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTargets {
    pub document: PathBuf,
    pub config: Option<PathBuf>,
    pub lists: Vec<PathBuf>,
}

impl WatchTargets {
    pub fn new(document: &Path, config: Option<&Path>, lists: &[PathBuf]) -> Self {
        Self {
            document: normalize(document),
            config: config.map(normalize),
            lists: lists.iter().map(|p| normalize(p)).collect(),
        }
    }

    /// Which trigger a change to `path` maps to
    pub fn classify(&self, path: &Path) -> Option<Trigger> {
        if self.config.as_deref() == Some(path) {
            Some(Trigger::ConfigChanged)
        } else if self.lists.iter().any(|p| p == path) {
            Some(Trigger::ListsChanged)
        } else if self.document == path {
            Some(Trigger::DocumentChanged)
        } else {
            None
        }
    }

    /// Directories to watch, one per distinct parent
    ///
    /// Parents are watched instead of the files so that editors which save
    /// by renaming a temp file over the original are still noticed.
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        std::iter::once(&self.document)
            .chain(self.config.iter())
            .chain(self.lists.iter())
            .filter_map(|p| p.parent())
            .filter(|p| p.is_dir())
            .map(Path::to_path_buf)
            .collect()
    }
}

/// Absolute, symlink-free form of a path that may not exist yet
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// File system watcher with debouncing
pub struct SourceWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    targets: WatchTargets,
}

impl SourceWatcher {
    /// Start watching `targets`, sending triggers to `tx`
    pub fn new(targets: WatchTargets, tx: Sender<Trigger>) -> Result<Self> {
        let classifier = targets.clone();

        let mut debouncer = new_debouncer(FS_COALESCE, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let mut sent = Vec::new();
                    for event in events {
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        let Some(trigger) = classifier.classify(&event.path) else {
                            continue;
                        };
                        // One trigger per kind per batch
                        if sent.contains(&trigger) {
                            continue;
                        }
                        tracing::debug!("{:?} from {}", trigger, event.path.display());
                        if tx.send(trigger).is_err() {
                            return;
                        }
                        sent.push(trigger);
                    }
                }
                Err(e) => {
                    tracing::warn!("File system watcher error: {:?}", e);
                }
            }
        })?;

        for dir in targets.directories() {
            debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
            tracing::info!("Watching {}", dir.display());
        }

        Ok(Self {
            _debouncer: debouncer,
            targets,
        })
    }

    pub fn targets(&self) -> &WatchTargets {
        &self.targets
    }
}
