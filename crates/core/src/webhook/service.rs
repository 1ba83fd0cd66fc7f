//! Webhook processor
//!
//! Drives a document through its folder lifecycle from provider status
//! callbacks. No state is kept between deliveries: each payload is
//! classified into a [`LifecycleState`] and combined with the correlation
//! mapping written when the sign request was made.

use std::sync::Arc;

use chrono::Utc;
use esignbridge_domain::{
    invoice_from_filename, DocumentConfig, DocumentInfo, DocumentMapping, ErpSetup,
    EsignBridgeError, LifecycleState, Result, WebhookPayload,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cache::CorrelationCache;
use crate::documents::{DocumentFolder, DocumentFolders, FolderOverrides};
use crate::erp::{build_log_entry, ErpClient, FolderLocations};
use crate::signing::{SigningProvider, StampRequester};
use crate::sink::{SinkEvent, StatusSink};

/// What one delivery did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookOutcome {
    /// Provider document ID from the payload.
    pub document_id: String,
    /// Signing status as reported by the provider.
    pub signing_status: String,
    /// State the delivery was classified into.
    pub lifecycle: LifecycleState,
    /// Document ID of the stamp request issued during this delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp_document_id: Option<String>,
}

/// Applies provider status callbacks to the document queue, the correlation
/// cache and the ERP.
pub struct WebhookProcessor {
    cache: CorrelationCache,
    folders: Arc<dyn DocumentFolders>,
    provider: Arc<dyn SigningProvider>,
    erp: Arc<dyn ErpClient>,
    sink: Arc<dyn StatusSink>,
    stamper: StampRequester,
    documents: DocumentConfig,
}

impl WebhookProcessor {
    /// `callback_url` is handed to stamp requests issued after signing.
    pub fn new(
        cache: CorrelationCache,
        folders: Arc<dyn DocumentFolders>,
        provider: Arc<dyn SigningProvider>,
        erp: Arc<dyn ErpClient>,
        sink: Arc<dyn StatusSink>,
        documents: DocumentConfig,
        callback_url: impl Into<String>,
    ) -> Self {
        let stamper = StampRequester::new(Arc::clone(&provider), cache.clone(), callback_url);
        Self { cache, folders, provider, erp, sink, stamper, documents }
    }

    /// Handle one delivery. Fails with `NotFound` when the document has no
    /// mapping; folder and stamp failures past that point are logged.
    pub async fn process(&self, payload: &WebhookPayload) -> Result<WebhookOutcome> {
        let document_id = payload.document_id();
        let attributes = &payload.data.attributes;
        let lifecycle = payload.lifecycle();
        info!(
            document_id,
            signing_status = %attributes.signing_status,
            stamping_status = %attributes.stamping_status,
            lifecycle = lifecycle.as_str(),
            filename = %attributes.filename,
            "Processing webhook"
        );

        let mapping = self.cache.mapping(document_id).await?.ok_or_else(|| {
            error!(document_id, "No document mapping for webhook");
            EsignBridgeError::NotFound(format!("document not found in cache: {document_id}"))
        })?;

        let invoice_number = if mapping.invoice_number.is_empty() {
            invoice_from_filename(&attributes.filename)
        } else {
            mapping.invoice_number.clone()
        };

        self.cache
            .save_document_info(&DocumentInfo {
                document_id: document_id.to_string(),
                email: mapping.email.clone(),
                invoice_number: invoice_number.clone(),
                filename: attributes.filename.clone(),
                signing_status: attributes.signing_status.clone(),
                stamping_status: attributes.stamping_status.clone(),
                doc_url: attributes.doc_url.clone(),
                updated_at: Utc::now(),
            })
            .await?;

        let setup = self.erp_setup(mapping.entry_no).await;
        let locations = FolderLocations::resolve(&self.documents, setup.as_ref());
        self.sink.publish(SinkEvent::ErpLogEntry(build_log_entry(payload, &mapping, &locations)));

        let overrides = setup.as_ref().map(FolderOverrides::for_webhook).unwrap_or_default();

        let stamp_document_id = match lifecycle {
            LifecycleState::AwaitingSignature => None,
            LifecycleState::Signed => {
                self.on_signed(payload, &mapping, &invoice_number, &overrides).await?
            }
            LifecycleState::StampRequested => {
                let signed = self.download(payload, &mapping).await?;
                self.replace_in_progress(document_id, &invoice_number, &signed, &overrides).await;
                None
            }
            LifecycleState::Stamped => {
                self.on_stamped(payload, &mapping, &overrides).await?;
                None
            }
        };

        Ok(WebhookOutcome {
            document_id: document_id.to_string(),
            signing_status: attributes.signing_status.clone(),
            lifecycle,
            stamp_document_id,
        })
    }

    async fn on_signed(
        &self,
        payload: &WebhookPayload,
        mapping: &DocumentMapping,
        invoice_number: &str,
        overrides: &FolderOverrides,
    ) -> Result<Option<String>> {
        let document_id = payload.document_id();
        let signed = self.download(payload, mapping).await?;
        self.replace_in_progress(document_id, invoice_number, &signed, overrides).await;

        if !mapping.wants_stamp() {
            return Ok(None);
        }

        info!(document_id, "Stamping required, sending stamp request");
        match self.stamper.request(&mapping.email, &signed, mapping).await {
            Ok(stamp) => Ok(Some(stamp.id)),
            Err(err) => {
                // Left for an external retry.
                error!(document_id, error = %err, "Failed to request stamping");
                Ok(None)
            }
        }
    }

    async fn on_stamped(
        &self,
        payload: &WebhookPayload,
        mapping: &DocumentMapping,
        overrides: &FolderOverrides,
    ) -> Result<()> {
        let document_id = payload.document_id();
        let filename = if mapping.filename.is_empty() {
            payload.data.attributes.filename.as_str()
        } else {
            mapping.filename.as_str()
        };

        let stamped = self.download(payload, mapping).await?;
        self.folders
            .save_to_finish_and_delete_progress(filename, &stamped, overrides)
            .await
            .map_err(|err| {
                error!(document_id, filename, error = %err, "Failed to save final document");
                err
            })?;

        info!(document_id, filename, size_bytes = stamped.len(), "Stamped document saved to finish");
        Ok(())
    }

    async fn download(&self, payload: &WebhookPayload, mapping: &DocumentMapping) -> Result<Vec<u8>> {
        let doc_url = &payload.data.attributes.doc_url;
        self.provider.download_document(&mapping.email, doc_url).await.map_err(|err| {
            error!(document_id = payload.document_id(), error = %err, "Failed to download document");
            err
        })
    }

    /// Overwrite the progress copy matching `invoice_number`. Failures are
    /// logged only.
    async fn replace_in_progress(
        &self,
        document_id: &str,
        invoice_number: &str,
        content: &[u8],
        overrides: &FolderOverrides,
    ) {
        let result = async {
            let filename =
                self.folders.find(invoice_number, DocumentFolder::Progress, overrides).await?;
            self.folders.replace_in_progress(&filename, content, overrides).await?;
            Ok::<_, EsignBridgeError>(filename)
        }
        .await;

        match result {
            Ok(filename) => info!(
                document_id,
                filename = %filename,
                size_bytes = content.len(),
                "Document replaced in progress folder"
            ),
            Err(err) => error!(document_id, error = %err, "Failed to replace document in progress"),
        }
    }

    async fn erp_setup(&self, entry_no: i64) -> Option<ErpSetup> {
        match self.cache.erp_setup_or_fetch(entry_no, self.erp.as_ref()).await {
            Ok(setup) => Some(setup),
            Err(err) => {
                warn!(entry_no, error = %err, "ERP setup unavailable, using configured folders");
                None
            }
        }
    }
}
