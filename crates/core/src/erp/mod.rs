//! ERP integration: port and log-entry mirroring

pub mod mirror;
pub mod ports;

pub use mirror::{build_log_entry, FolderLocations};
pub use ports::ErpClient;
