//! OAuth2 authorization codes

pub mod ports;
pub mod service;

pub use ports::AuthorizationCodeRepository;
pub use service::OAuthCodeService;
