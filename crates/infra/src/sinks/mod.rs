//! Status sink adapters

mod background;

pub use background::BackgroundSink;
