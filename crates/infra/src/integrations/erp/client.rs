//! OData V4 client for the ERP's e-sign entity sets
//!
//! All entity sets live under `{base}/ODataV4/Company('{company}')/` and use
//! basic authentication. A disabled integration turns every call into a
//! no-op; `fetch_setup` then reports `NotFound`.

use std::time::Duration;

use async_trait::async_trait;
use esignbridge_core::ErpClient;
use esignbridge_domain::{
    ErpApiLog, ErpConfig, ErpLogEntry, ErpSetup, EsignBridgeError, Result,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::http::HttpClient;

const SETUP_ENTITY: &str = "Api_MekariSetup";
const INVOICE_LOG_ENTITY: &str = "Api_MekariInvoiceLogEntries";
const API_LOG_ENTITY: &str = "Api_MekariAPILogEntries";

/// OData collection envelope.
#[derive(Debug, Deserialize)]
struct ODataCollection<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SetupRow {
    #[serde(rename = "File_Location_In", default)]
    location_in: String,
    #[serde(rename = "File_Location_Process", default)]
    location_process: String,
    #[serde(rename = "File_Location_Out", default)]
    location_out: String,
}

impl From<SetupRow> for ErpSetup {
    fn from(row: SetupRow) -> Self {
        Self {
            location_in: row.location_in,
            location_process: row.location_process,
            location_out: row.location_out,
        }
    }
}

pub struct ODataErpClient {
    http: HttpClient,
    enabled: bool,
    company_url: String,
    username: String,
    password: String,
}

impl ODataErpClient {
    pub fn new(config: &ErpConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: HttpClient, config: &ErpConfig) -> Self {
        let company_url = format!(
            "{}/ODataV4/Company('{}')",
            config.base_url.trim_end_matches('/'),
            urlencoding::encode(&config.company)
        );
        if !config.enabled {
            info!("ERP integration disabled");
        }
        Self {
            http,
            enabled: config.enabled,
            company_url,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn request(&self, method: Method, entity: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{entity}", self.company_url))
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
    }

    /// Send `builder` and return the body of a 2xx response.
    async fn execute(&self, builder: RequestBuilder, operation: &str) -> Result<String> {
        let response = self.http.send(builder).await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| {
            EsignBridgeError::Network(format!("failed to read ERP response: {err}"))
        })?;

        debug!(operation, status = status.as_u16(), "ERP response");
        if !status.is_success() {
            warn!(operation, status = status.as_u16(), body = %body, "ERP request failed");
            return Err(EsignBridgeError::upstream(status.as_u16(), body));
        }
        Ok(body)
    }
}

#[async_trait]
impl ErpClient for ODataErpClient {
    async fn fetch_setup(&self) -> Result<ErpSetup> {
        if !self.enabled {
            return Err(EsignBridgeError::NotFound("ERP integration disabled".into()));
        }

        let body = self.execute(self.request(Method::GET, SETUP_ENTITY), "fetch_setup").await?;
        let collection: ODataCollection<SetupRow> = serde_json::from_str(&body).map_err(|err| {
            EsignBridgeError::Internal(format!("failed to decode ERP setup: {err}"))
        })?;

        let setup: ErpSetup = collection
            .value
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| EsignBridgeError::NotFound("ERP has no e-sign setup".into()))?;
        info!(
            location_in = %setup.location_in,
            location_process = %setup.location_process,
            location_out = %setup.location_out,
            "ERP setup fetched"
        );
        Ok(setup)
    }

    async fn update_log_entry(&self, entry: &ErpLogEntry) -> Result<()> {
        if !self.enabled {
            debug!(entry_no = entry.entry_no, "ERP integration disabled, skipping log entry");
            return Ok(());
        }

        info!(
            document_id = %entry.document_id,
            entry_no = entry.entry_no,
            invoice_no = %entry.invoice_no,
            signing_status = %entry.signing_status,
            stamping_status = %entry.stamping_status,
            "Updating ERP invoice log entry"
        );
        let builder = self
            .request(Method::PATCH, &format!("{INVOICE_LOG_ENTITY}({})", entry.entry_no))
            .header(CONTENT_TYPE, "application/json")
            .header(IF_MATCH, "*")
            .json(entry);
        self.execute(builder, "update_log_entry").await?;
        Ok(())
    }

    async fn send_api_log(&self, log: &ErpApiLog) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let builder = self
            .request(Method::POST, API_LOG_ENTITY)
            .header(CONTENT_TYPE, "application/json")
            .json(log);
        self.execute(builder, "send_api_log").await?;
        debug!(invoice_no = %log.invoice_no, status = %log.status_description, "ERP API log sent");
        Ok(())
    }
}
