#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use esignbridge_api::{build_router, AppContext};
use esignbridge_domain::{
    AppConfig, AuthMode, CacheBackend, CacheConfig, ClientCredentials, Config, DatabaseConfig,
    DocumentConfig, ProviderConfig,
};
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const EMAIL: &str = "finance@example.com";

/// Bridge served on an ephemeral port, with a mock signing provider and
/// document folders in a temp directory.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub provider: MockServer,
    pub ctx: Arc<AppContext>,
    pub documents: DocumentConfig,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let provider = MockServer::start().await;
        let documents = DocumentConfig {
            base_path: temp_dir.path().join("documents").to_string_lossy().into_owned(),
            ..DocumentConfig::default()
        };

        let config = Config {
            app: AppConfig { base_url: "http://bridge.test".into(), ..AppConfig::default() },
            provider: ProviderConfig {
                auth_type: AuthMode::Hmac,
                base_url: provider.uri(),
                sso_base_url: provider.uri(),
                auth_url: format!("{}/auth", provider.uri()),
                timeout_secs: 5,
                oauth2: ClientCredentials::default(),
                hmac: ClientCredentials {
                    client_id: "hmac-client".into(),
                    client_secret: "hmac-secret".into(),
                },
            },
            cache: CacheConfig { backend: CacheBackend::Memory, max_capacity: 1_000 },
            database: DatabaseConfig {
                path: temp_dir.path().join("esignbridge.db").to_string_lossy().into_owned(),
                pool_size: 2,
            },
            document: documents.clone(),
            ..Config::default()
        };

        let ctx = Arc::new(AppContext::new(config).expect("context should build"));
        ctx.folders.ensure_directories().await.expect("folders should be created");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("listener should bind");
        let addr = listener.local_addr().expect("local addr");
        let router = build_router(Arc::clone(&ctx));
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server should run");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            provider,
            ctx,
            documents,
            _temp_dir: temp_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn ready_dir(&self) -> PathBuf {
        self.documents.ready_path()
    }

    pub fn progress_dir(&self) -> PathBuf {
        self.documents.progress_path()
    }

    pub fn finish_dir(&self) -> PathBuf {
        self.documents.finish_path()
    }

    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self.client.get(self.url(path)).send().await.expect("request should send");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> (u16, serde_json::Value) {
        self.post_raw(path, body.to_string()).await
    }

    pub async fn post_raw(&self, path: &str, body: String) -> (u16, serde_json::Value) {
        let response = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("request should send");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
