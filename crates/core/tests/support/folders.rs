use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use esignbridge_core::{DocumentFolder, DocumentFolders, FolderOverrides};
use esignbridge_domain::{EsignBridgeError, Result as DomainResult};

type Folder = BTreeMap<String, Vec<u8>>;

/// In-memory document queue keyed by folder root.
///
/// Roots are the folder names (`ready`, `progress`, `finish`) unless an
/// override path is given, in which case the override's display string is
/// used. Only `.pdf` files match `find`.
#[derive(Default, Clone)]
pub struct MockDocumentFolders {
    roots: Arc<Mutex<HashMap<String, Folder>>>,
    mutations: Arc<Mutex<usize>>,
}

impl MockDocumentFolders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, root: &str, filename: &str, content: &[u8]) -> Self {
        self.roots
            .lock()
            .unwrap()
            .entry(root.to_string())
            .or_default()
            .insert(filename.to_string(), content.to_vec());
        self
    }

    pub fn file(&self, root: &str, filename: &str) -> Option<Vec<u8>> {
        self.roots.lock().unwrap().get(root).and_then(|folder| folder.get(filename).cloned())
    }

    pub fn files(&self, root: &str) -> Vec<String> {
        self.roots
            .lock()
            .unwrap()
            .get(root)
            .map(|folder| folder.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of write, rename and delete operations performed.
    pub fn mutations(&self) -> usize {
        *self.mutations.lock().unwrap()
    }

    fn root(folder: DocumentFolder, overrides: &FolderOverrides) -> String {
        overrides
            .get(folder)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| folder.as_str().to_string())
    }

    fn bump(&self) {
        *self.mutations.lock().unwrap() += 1;
    }

    fn write(&self, root: &str, filename: &str, content: &[u8]) {
        self.bump();
        self.roots
            .lock()
            .unwrap()
            .entry(root.to_string())
            .or_default()
            .insert(filename.to_string(), content.to_vec());
    }

    fn rename(&self, from: &str, to: &str, filename: &str) -> DomainResult<()> {
        let mut roots = self.roots.lock().unwrap();
        if roots.get(to).is_some_and(|folder| folder.contains_key(filename)) {
            return Err(EsignBridgeError::Io(format!("{filename} already exists in {to}")));
        }
        let content = roots
            .get_mut(from)
            .and_then(|folder| folder.remove(filename))
            .ok_or_else(|| EsignBridgeError::Io(format!("{filename} missing from {from}")))?;
        roots.entry(to.to_string()).or_default().insert(filename.to_string(), content);
        drop(roots);
        self.bump();
        Ok(())
    }
}

#[async_trait]
impl DocumentFolders for MockDocumentFolders {
    async fn find(
        &self,
        invoice_number: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> DomainResult<String> {
        let root = Self::root(folder, overrides);
        self.files(&root)
            .into_iter()
            .find(|name| name.to_lowercase().ends_with(".pdf") && name.contains(invoice_number))
            .ok_or_else(|| {
                EsignBridgeError::NotFound(format!("no document for {invoice_number} in {root}"))
            })
    }

    async fn read(
        &self,
        filename: &str,
        folder: DocumentFolder,
        overrides: &FolderOverrides,
    ) -> DomainResult<Vec<u8>> {
        let root = Self::root(folder, overrides);
        self.file(&root, filename)
            .ok_or_else(|| EsignBridgeError::NotFound(format!("{filename} not in {root}")))
    }

    async fn move_to_progress(&self, filename: &str, overrides: &FolderOverrides) -> DomainResult<()> {
        self.rename(
            &Self::root(DocumentFolder::Ready, overrides),
            &Self::root(DocumentFolder::Progress, overrides),
            filename,
        )
    }

    async fn move_to_finish(&self, filename: &str, overrides: &FolderOverrides) -> DomainResult<()> {
        self.rename(
            &Self::root(DocumentFolder::Progress, overrides),
            &Self::root(DocumentFolder::Finish, overrides),
            filename,
        )
    }

    async fn replace_in_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> DomainResult<()> {
        self.write(&Self::root(DocumentFolder::Progress, overrides), filename, content);
        Ok(())
    }

    async fn save_to_finish_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> DomainResult<()> {
        self.write(&Self::root(DocumentFolder::Finish, overrides), filename, content);
        let progress = Self::root(DocumentFolder::Progress, overrides);
        if let Some(folder) = self.roots.lock().unwrap().get_mut(&progress) {
            folder.remove(filename);
        }
        Ok(())
    }

    async fn save_to_ready_and_delete_progress(
        &self,
        filename: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) -> DomainResult<()> {
        self.write(&Self::root(DocumentFolder::Ready, overrides), filename, content);
        let progress = Self::root(DocumentFolder::Progress, overrides);
        if let Some(folder) = self.roots.lock().unwrap().get_mut(&progress) {
            folder.remove(filename);
        }
        Ok(())
    }

    async fn ensure_directories(&self) -> DomainResult<()> {
        Ok(())
    }
}
