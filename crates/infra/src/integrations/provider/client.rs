//! Signing provider REST client
//!
//! Every call is authenticated (HMAC or OAuth2 bearer), logged with
//! redacted bodies and published to the status sink as an audit record.
//! In OAuth2 mode a 401 triggers one token refresh and one retry.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use esignbridge_core::{SigningProvider, SinkEvent, StatusSink};
use esignbridge_domain::{
    invoice_from_filename, EsignBridgeError, GlobalSignData, GlobalSignResponse, NewApiLog,
    ProviderConfig, ProviderSignRequest, Result, StampData, StampRequest, StampResponse,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

use super::hmac::{http_date, HmacSigner};
use super::redact;
use super::token::TokenService;
use crate::http::HttpClient;

const GLOBAL_SIGN_PATH: &str = "/documents/request_global_sign";
const STAMP_PATH: &str = "/documents/stamp";
const PROFILE_PATH: &str = "/profile";

/// How outbound requests are authenticated.
pub enum ProviderAuth {
    Hmac(HmacSigner),
    OAuth2(Arc<TokenService>),
}

impl ProviderAuth {
    fn label(&self) -> &'static str {
        match self {
            Self::Hmac(_) => "hmac",
            Self::OAuth2(_) => "oauth2",
        }
    }
}

/// One outbound call.
struct Call<'a> {
    email: &'a str,
    method: Method,
    path: &'a str,
    body: Option<String>,
    /// Raw downloads are not logged or audited.
    audited: bool,
}

pub struct ProviderClient {
    http: HttpClient,
    base_url: String,
    auth: ProviderAuth,
    sink: Arc<dyn StatusSink>,
}

impl ProviderClient {
    pub fn new(
        http: HttpClient,
        config: &ProviderConfig,
        auth: ProviderAuth,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        info!(auth_type = auth.label(), base_url = %config.base_url, "Provider client initialised");
        Self { http, base_url: config.base_url.trim_end_matches('/').to_string(), auth, sink }
    }

    async fn get_json<T: DeserializeOwned>(&self, email: &str, path: &str) -> Result<T> {
        let bytes = self
            .execute(Call { email, method: Method::GET, path, body: None, audited: true })
            .await?;
        decode(&bytes)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        email: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_string(body)
            .map_err(|err| EsignBridgeError::Internal(format!("failed to encode request: {err}")))?;
        let bytes = self
            .execute(Call { email, method: Method::POST, path, body: Some(body), audited: true })
            .await?;
        decode(&bytes)
    }

    async fn execute(&self, call: Call<'_>) -> Result<Vec<u8>> {
        let url = Url::parse(&format!("{}{}", self.base_url, call.path)).map_err(|err| {
            EsignBridgeError::Config(format!("invalid provider URL for {}: {err}", call.path))
        })?;

        let mut refreshed = false;
        loop {
            let request = self.authorize(self.build(&call, &url), &call, &url).await?;

            if call.audited {
                info!(
                    method = %call.method,
                    url = %url,
                    auth_type = self.auth.label(),
                    body = %call.body.as_deref().map(redact::for_log).unwrap_or_default(),
                    "Provider request"
                );
            }

            let started = Instant::now();
            let response = self.http.send(request).await?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(|err| {
                EsignBridgeError::Network(format!("failed to read provider response: {err}"))
            })?;
            let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

            if call.audited {
                let text = String::from_utf8_lossy(&bytes);
                info!(
                    status = status.as_u16(),
                    duration_ms,
                    body = %redact::for_log(&text),
                    "Provider response"
                );
                self.record(&call, &url, status, &text, duration_ms);
            }

            if status == StatusCode::UNAUTHORIZED && !refreshed {
                if let ProviderAuth::OAuth2(tokens) = &self.auth {
                    info!(email = call.email, "Received 401, refreshing token");
                    tokens.refresh_token(call.email).await.map_err(|err| {
                        error!(email = call.email, error = %err, "Token refresh failed");
                        EsignBridgeError::Auth(
                            "unauthorized: token refresh failed, re-authorization required".into(),
                        )
                    })?;
                    refreshed = true;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(EsignBridgeError::upstream(
                    status.as_u16(),
                    String::from_utf8_lossy(&bytes).into_owned(),
                ));
            }

            return Ok(bytes.to_vec());
        }
    }

    fn build(&self, call: &Call<'_>, url: &Url) -> RequestBuilder {
        let builder = self.http.request(call.method.clone(), url.clone());
        if !call.audited {
            return builder;
        }
        let builder = builder.header(ACCEPT, "application/json");
        match &call.body {
            Some(body) => builder.header(CONTENT_TYPE, "application/json").body(body.clone()),
            None => builder.header(CONTENT_TYPE, "application/json"),
        }
    }

    async fn authorize(
        &self,
        builder: RequestBuilder,
        call: &Call<'_>,
        url: &Url,
    ) -> Result<RequestBuilder> {
        match &self.auth {
            ProviderAuth::Hmac(signer) => {
                let signed = signer.sign(call.method.as_str(), url, Utc::now())?;
                Ok(builder.header(DATE, signed.date).header(AUTHORIZATION, signed.authorization))
            }
            ProviderAuth::OAuth2(tokens) => {
                let token = tokens.access_token(call.email).await?;
                Ok(builder
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .header(DATE, http_date(Utc::now())))
            }
        }
    }

    fn record(&self, call: &Call<'_>, url: &Url, status: StatusCode, response: &str, duration_ms: i64) {
        let request_body = call.body.as_deref().unwrap_or_default();
        self.sink.publish(SinkEvent::ApiCall(NewApiLog {
            endpoint: url.to_string(),
            method: call.method.to_string(),
            request_body: redact::for_audit(request_body),
            response_body: redact::for_audit(response),
            status_code: status.as_u16(),
            duration_ms,
            email: call.email.to_string(),
            reference: extract_reference(call.path, request_body),
            created_at: Utc::now(),
        }));
    }
}

#[async_trait]
impl SigningProvider for ProviderClient {
    async fn request_global_sign(
        &self,
        email: &str,
        request: &ProviderSignRequest,
    ) -> Result<GlobalSignData> {
        let response: GlobalSignResponse = self.post_json(email, GLOBAL_SIGN_PATH, request).await?;
        response.data.ok_or_else(|| {
            EsignBridgeError::Internal("global sign response carried no document".into())
        })
    }

    async fn request_stamp(&self, email: &str, request: &StampRequest) -> Result<StampData> {
        let response: StampResponse = self.post_json(email, STAMP_PATH, request).await?;
        response
            .data
            .ok_or_else(|| EsignBridgeError::Internal("stamp response carried no document".into()))
    }

    async fn download_document(&self, email: &str, doc_url: &str) -> Result<Vec<u8>> {
        info!(doc_url, email, "Downloading document");
        let content = self
            .execute(Call { email, method: Method::GET, path: doc_url, body: None, audited: false })
            .await
            .map_err(|err| {
                warn!(doc_url, error = %err, "Document download failed");
                err
            })?;
        info!(doc_url, size_bytes = content.len(), "Document downloaded");
        Ok(content)
    }

    async fn profile(&self, email: &str) -> Result<Value> {
        self.get_json(email, PROFILE_PATH).await
    }

    async fn documents(&self, email: &str, page: u32, per_page: u32) -> Result<Value> {
        self.get_json(email, &format!("/documents?page={page}&limit={per_page}")).await
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|err| EsignBridgeError::Internal(format!("failed to decode provider response: {err}")))
}

/// Invoice or entry reference for the audit record: the request's entry
/// number, else the invoice part of its filename, else the document ID in
/// the path.
fn extract_reference(path: &str, request_body: &str) -> Option<String> {
    if let Ok(body) = serde_json::from_str::<Value>(request_body) {
        if let Some(entry_no) = body.get("entry_no").and_then(Value::as_i64).filter(|n| *n > 0) {
            return Some(entry_no.to_string());
        }
        if let Some(filename) = body.get("filename").and_then(Value::as_str).filter(|f| !f.is_empty())
        {
            return Some(invoice_from_filename(filename));
        }
    }

    let path = path.split('?').next().unwrap_or_default();
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("documents"), Some(id))
            if !id.is_empty() && id != "request_global_sign" && id != "stamp" =>
        {
            Some(id.to_string())
        }
        _ => None,
    }
}
