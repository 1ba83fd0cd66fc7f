//! Port interface for the local document queue
//!
//! Documents move through three folders: ready, progress and finish. Each
//! operation accepts [`FolderOverrides`] so ERP-configured locations can
//! replace the statically configured ones.

use std::path::PathBuf;

use async_trait::async_trait;
use esignbridge_domain::{ErpSetup, Result};

/// One of the three queue folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFolder {
    Ready,
    Progress,
    Finish,
}

impl DocumentFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Progress => "progress",
            Self::Finish => "finish",
        }
    }
}

/// Optional per-folder roots that take precedence over configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderOverrides {
    pub ready: Option<PathBuf>,
    pub progress: Option<PathBuf>,
    pub finish: Option<PathBuf>,
}

impl FolderOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides for locating and reading a new document: the ERP `in`
    /// location replaces the ready folder on its own.
    pub fn for_pickup(setup: &ErpSetup) -> Self {
        Self { ready: non_empty(&setup.location_in), ..Self::default() }
    }

    /// Overrides for the ready → progress move after a submission. The ERP
    /// locations only apply as a pair; a partial setup falls back to the
    /// configured folders.
    pub fn for_submission(setup: &ErpSetup) -> Self {
        match both(setup) {
            Some((ready, progress)) => {
                Self { ready: Some(ready), progress: Some(progress), finish: None }
            }
            None => Self::default(),
        }
    }

    /// Overrides used while processing webhooks. `process` replaces the
    /// progress folder on its own; finished documents return to `in` only
    /// when both locations are set.
    pub fn for_webhook(setup: &ErpSetup) -> Self {
        Self {
            ready: None,
            progress: non_empty(&setup.location_process),
            finish: both(setup).map(|(finish, _)| finish),
        }
    }

    pub fn get(&self, folder: DocumentFolder) -> Option<&PathBuf> {
        match folder {
            DocumentFolder::Ready => self.ready.as_ref(),
            DocumentFolder::Progress => self.progress.as_ref(),
            DocumentFolder::Finish => self.finish.as_ref(),
        }
    }
}

fn non_empty(path: &str) -> Option<PathBuf> {
    (!path.trim().is_empty()).then(|| PathBuf::from(path))
}

/// `(in, process)` when the ERP setup names both locations.
fn both(setup: &ErpSetup) -> Option<(PathBuf, PathBuf)> {
    non_empty(&setup.location_in).zip(non_empty(&setup.location_process))
}

/// Filesystem-backed document queue.
#[async_trait]
pub trait DocumentFolders: Send + Sync {
    /// First file in `folder` whose name contains `invoice_number` and ends
    /// with the configured extension. `NotFound` when nothing matches.
    async fn find(
        &self,
        invoice_number: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> Result<String>;

    async fn read(
        &self,
        filename: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> Result<Vec<u8>>;

    /// Rename ready → progress. Fails when the source is missing or the
    /// destination already exists.
    async fn move_to_progress(&self, filename: &str, overrides: &FolderOverrides) -> Result<()>;

    /// Rename progress → finish. Kept for operator reprocessing; no request
    /// path calls it.
    async fn move_to_finish(&self, filename: &str, overrides: &FolderOverrides) -> Result<()>;

    /// Overwrite the progress copy of `filename`.
    async fn replace_in_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()>;

    /// Write `content` to finish, then delete the progress copy.
    ///
    /// Only the finish write can fail the call; a missing or undeletable
    /// progress copy is logged.
    async fn save_to_finish_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()>;

    /// Write `content` back to ready, then delete the progress copy. Kept for
    /// operator reprocessing; no request path calls it.
    async fn save_to_ready_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()>;

    /// Create the configured folders if they do not exist.
    async fn ensure_directories(&self) -> Result<()>;
}
