//! Sign request initiator
//!
//! Starts a document's lifecycle: picks the invoice file from the ready
//! folder, uploads it to the provider, parks it in progress and records the
//! correlation mapping the webhook processor resolves later.

use std::sync::Arc;

use esignbridge_domain::{
    DocumentMapping, ErpSetup, EsignBridgeError, GlobalSignData, GlobalSignRequest,
    GlobalSignResult, Result, StampData,
};
use tracing::{error, info, warn};

use super::annotations::{build_sign_request, build_stamp_request};
use super::ports::SigningProvider;
use super::validation::validate_sign_request;
use crate::cache::CorrelationCache;
use crate::documents::{DocumentFolder, DocumentFolders, FolderOverrides};
use crate::erp::ErpClient;
use crate::oauth::OAuthCodeService;

/// Result of a sign request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SignOutcome {
    /// Provider accepted the document for signing.
    Created(GlobalSignData),
    /// Stamp-only request for a document signed earlier.
    StampRequested(StampData),
    /// The user must authorize the bridge first.
    AuthorizationRequired { redirect_url: String },
}

impl SignOutcome {
    /// Response body shape returned to callers of the sign endpoint.
    pub fn into_result(self) -> GlobalSignResult {
        match self {
            Self::Created(data) => GlobalSignResult {
                success: true,
                data: Some(data),
                message: "Document sign request created successfully".to_string(),
                ..GlobalSignResult::default()
            },
            Self::StampRequested(_) => GlobalSignResult {
                success: true,
                message: "Document stamping request created successfully".to_string(),
                ..GlobalSignResult::default()
            },
            Self::AuthorizationRequired { redirect_url } => GlobalSignResult {
                success: false,
                need_auth: true,
                redirect_url: Some(redirect_url),
                message: "Authorization required. Please authorize first.".to_string(),
                ..GlobalSignResult::default()
            },
        }
    }
}

/// Submits stamp requests and forwards the correlation mapping to the new
/// stamp-phase document.
#[derive(Clone)]
pub struct StampRequester {
    provider: Arc<dyn SigningProvider>,
    cache: CorrelationCache,
    callback_url: String,
}

impl StampRequester {
    /// Stamp requests register `callback_url` for their status webhooks.
    pub fn new(
        provider: Arc<dyn SigningProvider>,
        cache: CorrelationCache,
        callback_url: impl Into<String>,
    ) -> Self {
        Self { provider, cache, callback_url: callback_url.into() }
    }

    /// Submit `signed_document` for stamping at the mapping's stamp
    /// positions and save the mapping under the new stamp document ID.
    pub async fn request(
        &self,
        email: &str,
        signed_document: &[u8],
        mapping: &DocumentMapping,
    ) -> Result<StampData> {
        let body = build_stamp_request(mapping, signed_document, &self.callback_url);
        info!(
            document_id = %mapping.document_id,
            filename = %mapping.filename,
            annotations = body.annotations.len(),
            "Sending stamp request"
        );

        let stamp = self.provider.request_stamp(email, &body).await?;
        info!(stamp_document_id = %stamp.id, status = %stamp.attributes.status, "Stamp request accepted");

        let forwarded = mapping.forward_to(&stamp.id);
        if let Err(err) = self.cache.save_mapping(&stamp.id, &forwarded).await {
            warn!(stamp_document_id = %stamp.id, error = %err, "Failed to save stamp document mapping");
        }

        Ok(stamp)
    }
}

/// Entry point for new sign requests and stamp-only follow-ups.
pub struct SignRequestInitiator {
    provider: Arc<dyn SigningProvider>,
    folders: Arc<dyn DocumentFolders>,
    cache: CorrelationCache,
    erp: Arc<dyn ErpClient>,
    oauth: Option<Arc<OAuthCodeService>>,
    stamper: StampRequester,
    callback_url: String,
}

impl SignRequestInitiator {
    /// `oauth` is `Some` when the provider is used in OAuth2 mode; requests
    /// then need an email with a stored authorization code.
    pub fn new(
        provider: Arc<dyn SigningProvider>,
        folders: Arc<dyn DocumentFolders>,
        cache: CorrelationCache,
        erp: Arc<dyn ErpClient>,
        oauth: Option<Arc<OAuthCodeService>>,
        callback_url: impl Into<String>,
    ) -> Self {
        let callback_url = callback_url.into();
        let stamper = StampRequester::new(Arc::clone(&provider), cache.clone(), callback_url.clone());
        Self { provider, folders, cache, erp, oauth, stamper, callback_url }
    }

    /// Submit the invoice document named in `request`. The file moves to
    /// progress only after the provider accepts it; a failed move is logged.
    pub async fn request_sign(&self, request: &GlobalSignRequest) -> Result<SignOutcome> {
        info!(
            email = %request.email,
            invoice_number = %request.invoice_number,
            entry_no = request.entry_no,
            signers = request.signers.len(),
            "Requesting global sign"
        );

        let setup = self.erp_setup(request.entry_no).await;

        if let Some(oauth) = &self.oauth {
            if request.email.trim().is_empty() {
                return Err(EsignBridgeError::Validation(
                    "email is required for OAuth2 authentication".to_string(),
                ));
            }
            let check = oauth.check_code(&request.email).await?;
            if !check.has_code {
                let redirect_url = check
                    .redirect_url
                    .unwrap_or_else(|| oauth.authorization_url(&request.email));
                info!(email = %request.email, "Authorization required before signing");
                return Ok(SignOutcome::AuthorizationRequired { redirect_url });
            }
        }

        if !request.signing && request.stamping {
            return self.stamp_only(request).await;
        }

        validate_sign_request(request)?;

        let pickup = setup.as_ref().map(FolderOverrides::for_pickup).unwrap_or_default();
        let filename = self
            .folders
            .find(&request.invoice_number, DocumentFolder::Ready, &pickup)
            .await?;
        let document = self.folders.read(&filename, DocumentFolder::Ready, &pickup).await?;

        let body = build_sign_request(request, &document, &filename, &self.callback_url);
        let data = self.provider.request_global_sign(&request.email, &body).await.map_err(|err| {
            error!(email = %request.email, error = %err, "Global sign request failed");
            err
        })?;
        info!(document_id = %data.id, status = %data.attributes.status, "Global sign request accepted");

        let overrides = setup.as_ref().map(FolderOverrides::for_submission).unwrap_or_default();
        if let Err(err) = self.folders.move_to_progress(&filename, &overrides).await {
            warn!(filename = %filename, error = %err, "Failed to move document to progress");
        }

        let mapping = DocumentMapping {
            document_id: data.id.clone(),
            email: request.email.clone(),
            invoice_number: request.invoice_number.clone(),
            filename,
            stamp_positions: request.stamp_positions,
            document_deadline: request.document_deadline.clone(),
            entry_no: request.entry_no,
            signing: request.signing,
            stamping: request.stamping,
        };
        self.save_mapping(&mapping).await;

        Ok(SignOutcome::Created(data))
    }

    /// Stamp a document whose signing finished in an earlier request.
    async fn stamp_only(&self, request: &GlobalSignRequest) -> Result<SignOutcome> {
        let mapping = self.cache.mapping_by_entry(request.entry_no).await?.ok_or_else(|| {
            EsignBridgeError::NotFound(format!(
                "failed to stamping, Please sign first your document: {}",
                request.invoice_number
            ))
        })?;

        let doc_url = format!("/documents/{}/download", mapping.document_id);
        let signed = self.provider.download_document(&request.email, &doc_url).await?;
        let stamp = self.stamper.request(&request.email, &signed, &mapping).await?;
        Ok(SignOutcome::StampRequested(stamp))
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

    async fn save_mapping(&self, mapping: &DocumentMapping) {
        if let Err(err) = self.cache.save_mapping(&mapping.document_id, mapping).await {
            warn!(document_id = %mapping.document_id, error = %err, "Failed to save document mapping");
        } else {
            info!(
                document_id = %mapping.document_id,
                invoice_number = %mapping.invoice_number,
                has_stamp_positions = mapping.stamp_positions.is_some(),
                "Document mapping saved"
            );
        }

        if let Err(err) = self.cache.save_mapping_by_entry(mapping.entry_no, mapping).await {
            warn!(entry_no = mapping.entry_no, error = %err, "Failed to save entry mapping");
        }
    }
}
