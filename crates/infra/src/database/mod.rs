//! Database implementations

pub mod api_log_repository;
pub mod manager;
pub mod oauth_code_repository;

pub use api_log_repository::*;
pub use manager::{DbConnection, DbManager};
pub use oauth_code_repository::*;
