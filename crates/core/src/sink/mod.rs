//! Best-effort event sink

pub mod ports;

pub use ports::{SinkEvent, StatusSink};
