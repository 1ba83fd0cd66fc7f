//! Sign and stamp requests

pub mod annotations;
pub mod ports;
pub mod service;
pub mod validation;

pub use ports::SigningProvider;
pub use service::{SignOutcome, SignRequestInitiator, StampRequester};
pub use validation::validate_sign_request;
