//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use esignbridge_core::{
    ApiLogRepository, AuthorizationCodeRepository, CorrelationCache, DocumentFolders, ErpClient,
    KeyValueStore, OAuthCodeService, SignRequestInitiator, SigningProvider, StatusSink,
    WebhookProcessor,
};
use esignbridge_domain::{CacheBackend, Config, Result};
use esignbridge_infra::{
    BackgroundSink, DbManager, FolderManager, HmacSigner, HttpClient, MemoryKeyValueStore,
    ODataErpClient, ProviderAuth, ProviderClient, SqliteApiLogRepository,
    SqliteAuthorizationCodeRepository, SqliteKeyValueStore, TokenService,
};
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthReport};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub store: Arc<dyn KeyValueStore>,
    pub api_logs: Arc<dyn ApiLogRepository>,
    pub provider: Arc<dyn SigningProvider>,
    pub folders: Arc<dyn DocumentFolders>,
    pub oauth: Arc<OAuthCodeService>,
    /// Present only when the provider is used in OAuth2 mode.
    pub tokens: Option<Arc<TokenService>>,
    pub initiator: Arc<SignRequestInitiator>,
    pub webhooks: Arc<WebhookProcessor>,
}

impl AppContext {
    /// Wire every adapter from `config`. Runs database migrations.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let store: Arc<dyn KeyValueStore> = match config.cache.backend {
            CacheBackend::Memory => Arc::new(MemoryKeyValueStore::new(config.cache.max_capacity)),
            CacheBackend::Sqlite => Arc::new(SqliteKeyValueStore::new(Arc::clone(&db))),
        };
        let codes: Arc<dyn AuthorizationCodeRepository> =
            Arc::new(SqliteAuthorizationCodeRepository::new(Arc::clone(&db)));
        let api_logs: Arc<dyn ApiLogRepository> =
            Arc::new(SqliteApiLogRepository::new(Arc::clone(&db)));

        let erp: Arc<dyn ErpClient> = Arc::new(ODataErpClient::new(&config.erp)?);
        let sink: Arc<dyn StatusSink> =
            Arc::new(BackgroundSink::new(Arc::clone(&erp), Arc::clone(&api_logs)));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()?;

        let tokens = config.provider.is_oauth2().then(|| {
            Arc::new(TokenService::new(
                http.clone(),
                Arc::clone(&store),
                Arc::clone(&codes),
                &config.provider,
                config.oauth.refresh_token_age_days,
            ))
        });
        let auth = match &tokens {
            Some(tokens) => ProviderAuth::OAuth2(Arc::clone(tokens)),
            None => ProviderAuth::Hmac(HmacSigner::new(
                config.provider.hmac.client_id.clone(),
                config.provider.hmac.client_secret.clone(),
            )),
        };
        let provider: Arc<dyn SigningProvider> =
            Arc::new(ProviderClient::new(http, &config.provider, auth, Arc::clone(&sink)));

        let folders: Arc<dyn DocumentFolders> = Arc::new(FolderManager::new(&config.document));
        let cache = CorrelationCache::new(Arc::clone(&store));
        let oauth = Arc::new(OAuthCodeService::new(
            codes,
            config.provider.auth_url.clone(),
            config.provider.oauth2.client_id.clone(),
        ));
        let callback_url = config.app.callback_url();

        let initiator = Arc::new(SignRequestInitiator::new(
            Arc::clone(&provider),
            Arc::clone(&folders),
            cache.clone(),
            Arc::clone(&erp),
            tokens.is_some().then(|| Arc::clone(&oauth)),
            callback_url.clone(),
        ));
        let webhooks = Arc::new(WebhookProcessor::new(
            cache,
            Arc::clone(&folders),
            Arc::clone(&provider),
            erp,
            sink,
            config.document.clone(),
            callback_url,
        ));

        info!(
            auth_type = %config.provider.auth_type,
            cache_backend = ?config.cache.backend,
            erp_enabled = config.erp.enabled,
            database = %config.database.path,
            "Application context initialised"
        );

        Ok(Self {
            config,
            db,
            store,
            api_logs,
            provider,
            folders,
            oauth,
            tokens,
            initiator,
            webhooks,
        })
    }

    pub fn health_check(&self) -> HealthReport {
        let database = match self.db.health_check() {
            Ok(()) => ComponentHealth::healthy("database"),
            Err(err) => ComponentHealth::unhealthy("database", err.to_string()),
        };
        HealthReport::from_components(vec![database])
    }
}
