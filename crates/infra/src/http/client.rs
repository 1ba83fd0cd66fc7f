use std::time::{Duration, Instant};

use esignbridge_domain::EsignBridgeError;
use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("esignbridge/", env!("CARGO_PKG_VERSION"));

/// Shared outbound client for the signing provider, its SSO and the ERP.
///
/// Every request is sent exactly once; document uploads and stamp requests
/// are not idempotent.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default 30 second timeout.
    pub fn new() -> Result<Self, EsignBridgeError> {
        Self::builder().build()
    }

    pub fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send `builder` once. Non-2xx answers are returned as responses;
    /// transport failures become [`EsignBridgeError::Network`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, EsignBridgeError> {
        let request = builder.build().map_err(to_domain)?;
        let method = request.method().clone();
        let host = request.url().host_str().unwrap_or_default().to_string();
        let path = request.url().path().to_string();
        let started = Instant::now();

        let result = self.inner.execute(request).await;
        let elapsed_ms = started.elapsed().as_millis();
        match result {
            Ok(response) => {
                debug!(%method, host, path, status = response.status().as_u16(), elapsed_ms, "HTTP call finished");
                Ok(response)
            }
            Err(err) => {
                warn!(%method, host, path, elapsed_ms, error = %err, "HTTP call failed");
                Err(to_domain(err))
            }
        }
    }
}

fn to_domain(err: reqwest::Error) -> EsignBridgeError {
    InfraError::from(err).into()
}

#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient, EsignBridgeError> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(to_domain)?;
        Ok(HttpClient { inner })
    }
}
