//! Tests for `SignRequestInitiator` and its hand-off to the webhook processor.

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use esignbridge_core::{
    AuthorizationCodeRepository, CorrelationCache, OAuthCodeService, SignOutcome,
    SignRequestInitiator, WebhookProcessor,
};
use esignbridge_domain::{
    DocumentConfig, DocumentDeadline, DocumentMapping, ErpSetup, EsignBridgeError,
    GlobalSignRequest, OAuthCodeRecord, Result as DomainResult, SignaturePosition, SignerRequest,
    WebhookAttributes, WebhookData, WebhookPayload,
};
use support::erp::MockErpClient;
use support::folders::MockDocumentFolders;
use support::provider::MockSigningProvider;
use support::sink::RecordingSink;
use support::store::MockKeyValueStore;

const CALLBACK: &str = "https://bridge.example.com/webhook/mekari";

#[derive(Default)]
struct StaticCodes(Mutex<HashMap<String, String>>);

impl StaticCodes {
    fn with(email: &str, code: &str) -> Self {
        let codes = Self::default();
        codes.0.lock().unwrap().insert(email.to_string(), code.to_string());
        codes
    }
}

#[async_trait]
impl AuthorizationCodeRepository for StaticCodes {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<OAuthCodeRecord>> {
        Ok(self.0.lock().unwrap().get(email).map(|code| OAuthCodeRecord {
            id: 1,
            email: email.to_string(),
            code: code.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    }

    async fn save_code(&self, email: &str, code: &str) -> DomainResult<()> {
        self.0.lock().unwrap().insert(email.to_string(), code.to_string());
        Ok(())
    }
}

fn signer() -> SignerRequest {
    SignerRequest {
        name: "Budi Santoso".to_string(),
        email: "budi@example.com".to_string(),
        sign_page: 1,
        signature_positions: Some(SignaturePosition { x: 120.0, y: 640.0, ..SignaturePosition::default() }),
        ..SignerRequest::default()
    }
}

fn sign_request() -> GlobalSignRequest {
    GlobalSignRequest {
        entry_no: 5,
        email: "finance@example.com".to_string(),
        invoice_number: "INV-2024-001".to_string(),
        signing: true,
        signers: vec![signer()],
        ..GlobalSignRequest::default()
    }
}

fn initiator(
    store: &MockKeyValueStore,
    folders: &MockDocumentFolders,
    provider: &MockSigningProvider,
    erp: MockErpClient,
    oauth: Option<Arc<OAuthCodeService>>,
) -> SignRequestInitiator {
    SignRequestInitiator::new(
        Arc::new(provider.clone()),
        Arc::new(folders.clone()),
        CorrelationCache::new(Arc::new(store.clone())),
        Arc::new(erp),
        oauth,
        CALLBACK,
    )
}

#[tokio::test]
async fn creates_request_moves_file_and_caches_mapping() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("ready", "INV-2024-001_contract.pdf", b"%PDF-1.7");
    let provider = MockSigningProvider::new().with_sign_document_id("doc-42");
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), None);

    let outcome = initiator.request_sign(&sign_request()).await.unwrap();

    let SignOutcome::Created(data) = outcome else { panic!("expected Created") };
    assert_eq!(data.id, "doc-42");
    assert!(folders.files("ready").is_empty());
    assert_eq!(folders.files("progress"), vec!["INV-2024-001_contract.pdf"]);

    let cache = CorrelationCache::new(Arc::new(store.clone()));
    let mapping = cache.mapping("doc-42").await.unwrap().unwrap();
    assert_eq!(mapping.invoice_number, "INV-2024-001");
    assert_eq!(mapping.filename, "INV-2024-001_contract.pdf");
    assert_eq!(mapping.entry_no, 5);
    assert_eq!(cache.mapping_by_entry(5).await.unwrap().unwrap().document_id, "doc-42");

    let sent = provider.sign_requests();
    assert_eq!(sent[0].callback_url, CALLBACK);
    assert_eq!(sent[0].signers[0].annotations[0].element_width, 180.0);
}

#[tokio::test]
async fn validation_failure_uploads_nothing() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("ready", "INV-2024-001_contract.pdf", b"%PDF");
    let provider = MockSigningProvider::new();
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), None);
    let request = GlobalSignRequest {
        document_deadline: Some(DocumentDeadline { signing_deadline: 2, ..DocumentDeadline::default() }),
        ..sign_request()
    };

    let err = initiator.request_sign(&request).await.unwrap_err();

    assert!(err.is_validation());
    assert!(provider.sign_requests().is_empty());
    assert_eq!(folders.files("ready").len(), 1);
}

#[tokio::test]
async fn missing_source_file_is_not_found() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("ready", "INV-2024-999.pdf", b"%PDF");
    let provider = MockSigningProvider::new();
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), None);

    let err = initiator.request_sign(&sign_request()).await.unwrap_err();

    assert!(matches!(err, EsignBridgeError::NotFound(_)));
    assert!(provider.sign_requests().is_empty());
}

#[tokio::test]
async fn erp_setup_selects_source_and_destination() {
    let setup = ErpSetup {
        location_in: "/erp/in".to_string(),
        location_process: "/erp/process".to_string(),
        location_out: "/erp/out".to_string(),
    };
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("/erp/in", "INV-2024-001_contract.pdf", b"%PDF");
    let provider = MockSigningProvider::new();
    let initiator = initiator(&store, &folders, &provider, MockErpClient::with_setup(setup), None);

    initiator.request_sign(&sign_request()).await.unwrap();

    assert_eq!(folders.files("/erp/process"), vec!["INV-2024-001_contract.pdf"]);
    assert!(store.raw("mekari:nav_setup:5").is_some());
}

#[tokio::test]
async fn erp_in_without_process_moves_within_configured_folders() {
    let setup = ErpSetup {
        location_in: "/erp/in".to_string(),
        location_process: String::new(),
        location_out: String::new(),
    };
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new()
        .with_file("/erp/in", "INV-2024-001_contract.pdf", b"%PDF")
        .with_file("ready", "INV-2024-001_contract.pdf", b"%PDF");
    let provider = MockSigningProvider::new().with_sign_document_id("doc-7");
    let initiator = initiator(&store, &folders, &provider, MockErpClient::with_setup(setup), None);

    initiator.request_sign(&sign_request()).await.unwrap();

    assert_eq!(provider.sign_requests().len(), 1);
    assert_eq!(folders.files("/erp/in"), vec!["INV-2024-001_contract.pdf"]);
    assert!(folders.files("ready").is_empty());
    assert_eq!(folders.files("progress"), vec!["INV-2024-001_contract.pdf"]);
}

#[tokio::test]
async fn oauth_mode_without_code_asks_for_authorization() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("ready", "INV-2024-001_contract.pdf", b"%PDF");
    let provider = MockSigningProvider::new();
    let oauth = Arc::new(OAuthCodeService::new(
        Arc::new(StaticCodes::default()),
        "https://account.example.com",
        "client-1",
    ));
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), Some(oauth));

    let outcome = initiator.request_sign(&sign_request()).await.unwrap();

    let SignOutcome::AuthorizationRequired { redirect_url } = outcome else {
        panic!("expected AuthorizationRequired");
    };
    assert!(redirect_url.starts_with("https://account.example.com/auth?client_id=client-1"));
    assert!(provider.sign_requests().is_empty());

    let result = SignOutcome::AuthorizationRequired { redirect_url }.into_result();
    assert!(result.need_auth);
    assert!(!result.success);
}

#[tokio::test]
async fn oauth_mode_requires_email() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new();
    let provider = MockSigningProvider::new();
    let oauth = Arc::new(OAuthCodeService::new(Arc::new(StaticCodes::default()), "https://a", "c"));
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), Some(oauth));

    let err = initiator
        .request_sign(&GlobalSignRequest { email: String::new(), ..sign_request() })
        .await
        .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn stamp_only_requires_earlier_signature() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new();
    let provider = MockSigningProvider::new();
    let oauth = Arc::new(OAuthCodeService::new(
        Arc::new(StaticCodes::with("finance@example.com", "code-1")),
        "https://a",
        "c",
    ));
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), Some(oauth));
    let request = GlobalSignRequest { signing: false, stamping: true, ..sign_request() };

    let err = initiator.request_sign(&request).await.unwrap_err();
    assert!(err.to_string().contains("Please sign first your document"));

    let cache = CorrelationCache::new(Arc::new(store.clone()));
    let earlier = DocumentMapping {
        document_id: "doc-7".to_string(),
        filename: "INV-2024-001_contract.pdf".to_string(),
        invoice_number: "INV-2024-001".to_string(),
        entry_no: 5,
        ..DocumentMapping::default()
    };
    cache.save_mapping_by_entry(5, &earlier).await.unwrap();

    let outcome = initiator.request_sign(&request).await.unwrap();

    assert!(matches!(outcome, SignOutcome::StampRequested(_)));
    assert_eq!(provider.downloads(), vec!["/documents/doc-7/download"]);
    assert_eq!(cache.mapping("stamp-001").await.unwrap().unwrap().filename, earlier.filename);
}

/// Invoice INV-2024-001 from upload to signed copy in progress.
#[tokio::test]
async fn invoice_round_trip_through_sign_and_webhook() {
    let store = MockKeyValueStore::new();
    let folders = MockDocumentFolders::new().with_file("ready", "INV-2024-001_contract.pdf", b"unsigned");
    let provider = MockSigningProvider::new().with_sign_document_id("doc-e2e").with_download(b"signed");
    let initiator = initiator(&store, &folders, &provider, MockErpClient::disabled(), None);

    let SignOutcome::Created(data) = initiator.request_sign(&sign_request()).await.unwrap() else {
        panic!("expected Created");
    };
    assert!(folders.files("ready").is_empty());
    assert_eq!(folders.file("progress", "INV-2024-001_contract.pdf").unwrap(), b"unsigned");

    let processor = WebhookProcessor::new(
        CorrelationCache::new(Arc::new(store.clone())),
        Arc::new(folders.clone()),
        Arc::new(provider.clone()),
        Arc::new(MockErpClient::disabled()),
        Arc::new(RecordingSink::default()),
        DocumentConfig::default(),
        CALLBACK,
    );
    let webhook = WebhookPayload {
        data: WebhookData {
            id: data.id.clone(),
            kind: "document".to_string(),
            attributes: WebhookAttributes {
                filename: "INV-2024-001_contract.pdf".to_string(),
                doc_url: "/documents/doc-e2e/download".to_string(),
                signing_status: "completed".to_string(),
                stamping_status: "none".to_string(),
                ..WebhookAttributes::default()
            },
        },
    };

    processor.process(&webhook).await.unwrap();

    assert_eq!(folders.file("progress", "INV-2024-001_contract.pdf").unwrap(), b"signed");
    assert!(provider.stamp_requests().is_empty());
}
