//! Local document queue

pub mod ports;

pub use ports::{DocumentFolder, DocumentFolders, FolderOverrides};
