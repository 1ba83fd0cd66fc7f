//! Key-value cache port and typed correlation helpers

pub mod correlation;
pub mod ports;

pub use correlation::CorrelationCache;
pub use ports::KeyValueStore;
