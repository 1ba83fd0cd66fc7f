//! Document folder adapter

pub mod folders;

pub use folders::FolderManager;
