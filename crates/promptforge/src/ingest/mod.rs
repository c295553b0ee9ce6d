//! Tracking of in-flight source files and glossary entries.

pub mod glossary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use log::{debug, warn};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{ExtractError, IngestError};
use crate::extractor::{self, ExtractedContent};
use glossary::GlossaryEntry;

/// Admission cap for the main submission set.
pub const MAX_SOURCE_FILES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Ready,
    Error(String),
}

impl FileStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// One entry in the submission set. Duplicate names are independent entries;
/// the `id` correlation token ties an extraction task back to its entry.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: Uuid,
    pub name: String,
    pub status: FileStatus,
    pub content: Option<ExtractedContent>,
}

/// Owns the ordered source-file list and the glossary list.
///
/// Cloning is cheap and shares state; per-file extraction completions are
/// applied as atomic read-modify-writes under the write lock so interleaved
/// completions never lose updates.
#[derive(Clone, Default)]
pub struct FileTracker {
    files: Arc<RwLock<Vec<SourceFile>>>,
    glossary: Arc<RwLock<Vec<GlossaryEntry>>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl FileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a batch of files.
    ///
    /// Rejects the whole batch before any extraction starts if it would push
    /// the list past [`MAX_SOURCE_FILES`]. Otherwise appends one `Pending`
    /// entry per file synchronously, then spawns an independent extraction
    /// task per file. One file's failure never aborts the others.
    pub async fn add_paths(&self, paths: &[PathBuf]) -> Result<(), IngestError> {
        let adding = paths.len();
        let mut spawned = Vec::with_capacity(adding);

        {
            let mut files = self.files.write().await;
            let current = files.len();
            if current + adding > MAX_SOURCE_FILES {
                return Err(IngestError::TooManyFiles {
                    current,
                    adding,
                    max: MAX_SOURCE_FILES,
                });
            }

            for path in paths {
                let id = Uuid::new_v4();
                files.push(SourceFile {
                    id,
                    name: extractor::display_name(path),
                    status: FileStatus::Pending,
                    content: None,
                });
                spawned.push((id, path.clone()));
            }
        }

        let mut tasks = self.tasks.lock().await;
        for (id, path) in spawned {
            let tracker = self.clone();
            tasks.push(tokio::spawn(async move {
                tracker.run_extraction(id, path).await;
            }));
        }

        Ok(())
    }

    async fn run_extraction(&self, id: Uuid, path: PathBuf) {
        let outcome = extractor::extract(&path).await;

        let mut files = self.files.write().await;
        let Some(entry) = files.iter_mut().find(|f| f.id == id) else {
            // Removed (or the pipeline was reset) while extraction ran.
            debug!("Extraction finished for removed entry {}", id);
            return;
        };

        match outcome {
            Ok(content) => {
                debug!("Extraction ready: '{}'", entry.name);
                entry.status = FileStatus::Ready;
                entry.content = Some(content);
            }
            Err(e) => {
                warn!("Extraction failed for '{}': {}", entry.name, e);
                entry.status = FileStatus::Error(e.to_string());
                entry.content = None;
            }
        }
    }

    /// Removes by position regardless of status. Out of range is a no-op.
    pub async fn remove(&self, index: usize) {
        let mut files = self.files.write().await;
        if index < files.len() {
            files.remove(index);
        }
    }

    pub async fn files(&self) -> Vec<SourceFile> {
        self.files.read().await.clone()
    }

    /// Contents of `Ready` entries in list order.
    pub async fn ready_contents(&self) -> Vec<ExtractedContent> {
        self.files
            .read()
            .await
            .iter()
            .filter(|f| f.status.is_ready())
            .filter_map(|f| f.content.clone())
            .collect()
    }

    pub async fn ready_count(&self) -> usize {
        self.files
            .read()
            .await
            .iter()
            .filter(|f| f.status.is_ready())
            .count()
    }

    pub async fn pending_count(&self) -> usize {
        self.files
            .read()
            .await
            .iter()
            .filter(|f| f.status.is_pending())
            .count()
    }

    /// Clears the submission set. Glossary entries are kept.
    pub async fn clear(&self) {
        self.files.write().await.clear();
    }

    /// Awaits all extraction tasks spawned so far. Every `Pending` entry has
    /// resolved to `Ready` or `Error` once this returns.
    pub async fn await_extractions(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().await;
            tasks.drain(..).collect()
        };

        for outcome in join_all(handles).await {
            if let Err(e) = outcome {
                warn!("Extraction task panicked: {}", e);
            }
        }
    }

    /// Synchronous-per-file glossary ingestion; no loading state.
    pub async fn add_glossary_path(&self, path: &Path) -> Result<(), ExtractError> {
        let entry = glossary::read_glossary_file(path).await?;
        self.glossary.write().await.push(entry);
        Ok(())
    }

    pub async fn remove_glossary(&self, index: usize) {
        let mut entries = self.glossary.write().await;
        if index < entries.len() {
            entries.remove(index);
        }
    }

    pub async fn glossary_entries(&self) -> Vec<GlossaryEntry> {
        self.glossary.read().await.clone()
    }
}
