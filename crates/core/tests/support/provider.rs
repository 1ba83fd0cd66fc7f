use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use esignbridge_core::SigningProvider;
use esignbridge_domain::{
    EsignBridgeError, GlobalSignAttributes, GlobalSignData, ProviderSignRequest,
    Result as DomainResult, StampAttributes, StampData, StampRequest,
};
use serde_json::{json, Value};

/// Scripted `SigningProvider` that records every call.
#[derive(Clone)]
pub struct MockSigningProvider {
    sign_document_id: String,
    stamp_document_id: Option<String>,
    download: Option<Vec<u8>>,
    sign_requests: Arc<Mutex<Vec<ProviderSignRequest>>>,
    stamp_requests: Arc<Mutex<Vec<StampRequest>>>,
    downloads: Arc<Mutex<Vec<String>>>,
}

impl Default for MockSigningProvider {
    fn default() -> Self {
        Self {
            sign_document_id: "doc-001".to_string(),
            stamp_document_id: Some("stamp-001".to_string()),
            download: Some(b"%PDF-signed".to_vec()),
            sign_requests: Arc::default(),
            stamp_requests: Arc::default(),
            downloads: Arc::default(),
        }
    }
}

impl MockSigningProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sign_document_id(mut self, id: &str) -> Self {
        self.sign_document_id = id.to_string();
        self
    }

    pub fn with_download(mut self, bytes: &[u8]) -> Self {
        self.download = Some(bytes.to_vec());
        self
    }

    /// Every download answers with a 502.
    pub fn failing_downloads(mut self) -> Self {
        self.download = None;
        self
    }

    /// Every stamp request answers with a 422.
    pub fn failing_stamps(mut self) -> Self {
        self.stamp_document_id = None;
        self
    }

    pub fn sign_requests(&self) -> Vec<ProviderSignRequest> {
        self.sign_requests.lock().unwrap().clone()
    }

    pub fn stamp_requests(&self) -> Vec<StampRequest> {
        self.stamp_requests.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SigningProvider for MockSigningProvider {
    async fn request_global_sign(
        &self,
        _email: &str,
        request: &ProviderSignRequest,
    ) -> DomainResult<GlobalSignData> {
        self.sign_requests.lock().unwrap().push(request.clone());
        Ok(GlobalSignData {
            id: self.sign_document_id.clone(),
            kind: "document".to_string(),
            attributes: GlobalSignAttributes {
                doc_id: self.sign_document_id.clone(),
                filename: request.filename.clone(),
                status: "pending".to_string(),
                ..GlobalSignAttributes::default()
            },
        })
    }

    async fn request_stamp(&self, _email: &str, request: &StampRequest) -> DomainResult<StampData> {
        self.stamp_requests.lock().unwrap().push(request.clone());
        let id = self
            .stamp_document_id
            .clone()
            .ok_or_else(|| EsignBridgeError::upstream(422, "quota exhausted"))?;
        Ok(StampData {
            id: id.clone(),
            kind: "document".to_string(),
            attributes: StampAttributes {
                doc_id: id,
                filename: request.filename.clone(),
                status: "pending".to_string(),
                ..StampAttributes::default()
            },
        })
    }

    async fn download_document(&self, _email: &str, doc_url: &str) -> DomainResult<Vec<u8>> {
        self.downloads.lock().unwrap().push(doc_url.to_string());
        self.download.clone().ok_or_else(|| EsignBridgeError::upstream(502, "bad gateway"))
    }

    async fn profile(&self, email: &str) -> DomainResult<Value> {
        Ok(json!({"data": {"attributes": {"email": email}}}))
    }

    async fn documents(&self, _email: &str, page: u32, per_page: u32) -> DomainResult<Value> {
        Ok(json!({"data": [], "page": page, "limit": per_page}))
    }
}
