//! Filesystem document queue
//!
//! Three sibling folders under `document.base_path` (ready, progress,
//! finish), each of which can be redirected per call by
//! [`FolderOverrides`]. Blocking filesystem work runs on the blocking pool.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use esignbridge_core::{DocumentFolder, DocumentFolders, FolderOverrides};
use esignbridge_domain::{DocumentConfig, EsignBridgeError, Result};
use tokio::task;
use tracing::{debug, info, warn};

use crate::database::manager::map_join_error;
use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct FolderManager {
    ready: PathBuf,
    progress: PathBuf,
    finish: PathBuf,
    extension: String,
}

impl FolderManager {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            ready: config.ready_path(),
            progress: config.progress_path(),
            finish: config.finish_path(),
            extension: config.file_extension.to_lowercase(),
        }
    }

    fn root(&self, folder: DocumentFolder, overrides: &FolderOverrides) -> PathBuf {
        if let Some(path) = overrides.get(folder) {
            return path.clone();
        }
        match folder {
            DocumentFolder::Ready => self.ready.clone(),
            DocumentFolder::Progress => self.progress.clone(),
            DocumentFolder::Finish => self.finish.clone(),
        }
    }
}

#[async_trait]
impl DocumentFolders for FolderManager {
    async fn find(
        &self,
        invoice_number: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> Result<String> {
        let root = self.root(folder, overrides);
        let invoice_number = invoice_number.to_string();
        let extension = self.extension.clone();

        blocking(move || find_in(&root, &invoice_number, &extension, folder)).await
    }

    async fn read(
        &self,
        filename: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> Result<Vec<u8>> {
        let path = self.root(folder, overrides).join(filename);
        blocking(move || fs::read(&path).map_err(io_error)).await
    }

    async fn move_to_progress(&self, filename: &str, overrides: &FolderOverrides) -> Result<()> {
        let from = self.root(DocumentFolder::Ready, overrides).join(filename);
        let to = self.root(DocumentFolder::Progress, overrides).join(filename);
        blocking(move || rename(&from, &to)).await
    }

    async fn move_to_finish(&self, filename: &str, overrides: &FolderOverrides) -> Result<()> {
        let from = self.root(DocumentFolder::Progress, overrides).join(filename);
        let to = self.root(DocumentFolder::Finish, overrides).join(filename);
        blocking(move || rename(&from, &to)).await
    }

    async fn replace_in_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()> {
        let path = self.root(DocumentFolder::Progress, overrides).join(filename);
        let content = content.to_vec();
        blocking(move || {
            fs::write(&path, &content).map_err(io_error)?;
            debug!(path = %path.display(), size_bytes = content.len(), "Progress copy replaced");
            Ok(())
        })
        .await
    }

    async fn save_to_finish_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()> {
        let target = self.root(DocumentFolder::Finish, overrides).join(filename);
        let progress = self.root(DocumentFolder::Progress, overrides).join(filename);
        let content = content.to_vec();
        blocking(move || save_and_delete(&target, &progress, &content)).await
    }

    async fn save_to_ready_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> Result<()> {
        let target = self.root(DocumentFolder::Ready, overrides).join(filename);
        let progress = self.root(DocumentFolder::Progress, overrides).join(filename);
        let content = content.to_vec();
        blocking(move || save_and_delete(&target, &progress, &content)).await
    }

    async fn ensure_directories(&self) -> Result<()> {
        let dirs = [self.ready.clone(), self.progress.clone(), self.finish.clone()];
        blocking(move || {
            for dir in &dirs {
                fs::create_dir_all(dir).map_err(io_error)?;
            }
            info!(
                ready = %dirs[0].display(),
                progress = %dirs[1].display(),
                finish = %dirs[2].display(),
                "Document folders ready"
            );
            Ok(())
        })
        .await
    }
}

// ============================================================================
// Filesystem Operations (synchronous)
// ============================================================================

fn find_in(root: &Path, invoice_number: &str, extension: &str, folder: DocumentFolder) -> Result<String> {
    let entries = fs::read_dir(root).map_err(|err| {
        EsignBridgeError::Io(format!("failed to read {} folder {}: {err}", folder.as_str(), root.display()))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(io_error)?;
        if entry.file_type().map_err(io_error)?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    names
        .into_iter()
        .find(|name| name.to_lowercase().ends_with(extension) && name.contains(invoice_number))
        .ok_or_else(|| {
            EsignBridgeError::NotFound(format!(
                "no file for invoice {invoice_number} in {} folder",
                folder.as_str()
            ))
        })
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(EsignBridgeError::Io(format!("source file does not exist: {}", from.display())));
    }
    if to.exists() {
        return Err(EsignBridgeError::Io(format!(
            "destination file already exists: {}",
            to.display()
        )));
    }
    fs::rename(from, to).map_err(io_error)?;
    info!(from = %from.display(), to = %to.display(), "Document moved");
    Ok(())
}

fn save_and_delete(target: &Path, progress: &Path, content: &[u8]) -> Result<()> {
    fs::write(target, content).map_err(io_error)?;
    info!(path = %target.display(), size_bytes = content.len(), "Document saved");

    match fs::remove_file(progress) {
        Ok(()) => debug!(path = %progress.display(), "Progress copy deleted"),
        Err(err) => {
            warn!(path = %progress.display(), error = %err, "Failed to delete progress copy")
        }
    }
    Ok(())
}

fn io_error(err: std::io::Error) -> EsignBridgeError {
    match EsignBridgeError::from(InfraError::from(err)) {
        EsignBridgeError::NotFound(message) => EsignBridgeError::Io(message),
        other => other,
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    task::spawn_blocking(f).await.map_err(map_join_error)?
}
