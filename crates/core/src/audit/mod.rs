//! Audit log of provider calls

pub mod ports;

pub use ports::ApiLogRepository;
