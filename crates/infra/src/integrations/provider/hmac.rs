//! HMAC-SHA256 request signing
//!
//! The provider verifies `base64(HMAC-SHA256(secret, "date: {date}\n{request-line}"))`
//! where the request line is `{METHOD} {path?query} HTTP/1.1`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use esignbridge_domain::{EsignBridgeError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// HTTP `Date` header format (RFC 1123, always GMT).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Headers to attach to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub authorization: String,
}

#[derive(Clone)]
pub struct HmacSigner {
    client_id: String,
    client_secret: String,
}

impl HmacSigner {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }

    pub fn sign(&self, method: &str, url: &Url, at: DateTime<Utc>) -> Result<SignedHeaders> {
        let mut request_path = url.path().to_string();
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            request_path.push('?');
            request_path.push_str(query);
        }

        let date = http_date(at);
        let payload = format!("date: {date}\n{method} {request_path} HTTP/1.1");

        let mut mac = HmacSha256::new_from_slice(self.client_secret.as_bytes())
            .map_err(|err| EsignBridgeError::Auth(format!("invalid HMAC secret: {err}")))?;
        mac.update(payload.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        tracing::debug!(method, request_path = %request_path, date = %date, "HMAC request signed");

        Ok(SignedHeaders {
            authorization: format!(
                r#"hmac username="{}", algorithm="hmac-sha256", headers="date request-line", signature="{}""#,
                self.client_id, signature
            ),
            date,
        })
    }
}

pub fn http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}
