//! Signing provider client against a mock provider.

mod support;

use std::sync::Arc;

use esignbridge_core::{KeyValueStore, SigningProvider};
use esignbridge_domain::{
    AuthMode, EsignBridgeError, ProviderSignRequest, ProviderSigner, StampAnnotation, StampRequest,
};
use esignbridge_infra::{
    HmacSigner, HttpClient, MemoryKeyValueStore, ProviderAuth, ProviderClient,
    SqliteAuthorizationCodeRepository, TokenService,
};
use serde_json::json;
use support::{provider_config, RecordingSink, TestDatabase};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "signer@example.com";

fn sign_request(doc: String) -> ProviderSignRequest {
    ProviderSignRequest {
        doc,
        filename: "INV-2024-001.pdf".into(),
        signers: vec![ProviderSigner {
            name: "Budi".into(),
            email: EMAIL.into(),
            phone_number: None,
            requires_otp: false,
            annotations: Vec::new(),
            order: 1,
        }],
        callback_url: "https://bridge.example.com/webhook/mekari".into(),
        document_deadline: None,
        entry_no: 7,
    }
}

fn hmac_client(server: &MockServer, sink: Arc<RecordingSink>) -> ProviderClient {
    let config = provider_config(&server.uri(), AuthMode::Hmac);
    ProviderClient::new(
        HttpClient::new().unwrap(),
        &config,
        ProviderAuth::Hmac(HmacSigner::new("hmac-client", "hmac-secret")),
        sink,
    )
}

struct OAuthFixture {
    client: ProviderClient,
    store: Arc<MemoryKeyValueStore>,
    _db: TestDatabase,
}

async fn oauth_client(server: &MockServer, sink: Arc<RecordingSink>) -> OAuthFixture {
    let db = TestDatabase::new();
    let config = provider_config(&server.uri(), AuthMode::OAuth2);
    let store = Arc::new(MemoryKeyValueStore::new(100));
    store.set("mekari:access_token:signer@example.com", "stale", None).await.unwrap();
    store.set("mekari:refresh_token:signer@example.com", "refresh-1", None).await.unwrap();

    let tokens = TokenService::new(
        HttpClient::new().unwrap(),
        store.clone(),
        Arc::new(SqliteAuthorizationCodeRepository::new(db.manager.clone())),
        &config,
        30,
    );
    let client = ProviderClient::new(
        HttpClient::new().unwrap(),
        &config,
        ProviderAuth::OAuth2(Arc::new(tokens)),
        sink,
    );
    OAuthFixture { client, store, _db: db }
}

#[tokio::test]
async fn hmac_global_sign_is_signed_and_audited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/request_global_sign"))
        .and(header_exists("authorization"))
        .and(header_exists("date"))
        .and(body_partial_json(json!({"filename": "INV-2024-001.pdf", "entry_no": 7})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": "doc-123",
                "type": "document",
                "attributes": { "filename": "INV-2024-001.pdf", "status": "pending" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = hmac_client(&server, sink.clone());

    let data = client.request_global_sign(EMAIL, &sign_request("QUJD".repeat(50))).await.unwrap();
    assert_eq!(data.id, "doc-123");

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(authorization.starts_with(r#"hmac username="hmac-client""#));

    let calls = sink.api_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].status_code, 201);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(calls[0].email, EMAIL);
    assert_eq!(calls[0].reference.as_deref(), Some("7"));
    assert!(calls[0].endpoint.ends_with("/documents/request_global_sign"));
    assert!(calls[0].request_body.contains("[base64 truncated, total 200 chars]"));
}

#[tokio::test]
async fn stamp_without_data_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents/stamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = hmac_client(&server, Arc::new(RecordingSink::default()));
    let request = StampRequest {
        doc: "QUJD".into(),
        filename: "INV-9.pdf".into(),
        annotations: vec![StampAnnotation {
            page: 1,
            position_x: 10.0,
            position_y: 20.0,
            element_width: 80.0,
            element_height: 80.0,
            canvas_width: 595.0,
            canvas_height: 841.0,
            type_of: "meterai".into(),
        }],
        callback_url: String::new(),
        document_deadline: None,
    };

    let err = client.request_stamp(EMAIL, &request).await.unwrap_err();
    assert!(matches!(err, EsignBridgeError::Internal(_)));
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = hmac_client(&server, sink.clone());

    let err = client.documents(EMAIL, 2, 5).await.unwrap_err();
    match err {
        EsignBridgeError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "provider down");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    // Failed calls are audited too.
    assert_eq!(sink.api_calls()[0].status_code, 500);
}

#[tokio::test]
async fn download_returns_raw_bytes_without_audit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/doc-123/signed.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 signed".to_vec()))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = hmac_client(&server, sink.clone());

    let bytes = client.download_document(EMAIL, "/files/doc-123/signed.pdf").await.unwrap();
    assert_eq!(bytes, b"%PDF-1.7 signed");
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn oauth_401_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_partial_json(json!({"grant_type": "refresh_token", "refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"email": EMAIL}})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let fixture = oauth_client(&server, sink.clone()).await;

    let profile = fixture.client.profile(EMAIL).await.unwrap();
    assert_eq!(profile["data"]["email"], EMAIL);

    let refresh = fixture.store.get("mekari:refresh_token:signer@example.com").await.unwrap();
    assert_eq!(refresh.as_deref(), Some("refresh-2"));

    let statuses: Vec<u16> = sink.api_calls().iter().map(|call| call.status_code).collect();
    assert_eq!(statuses, vec![401, 200]);
}

#[tokio::test]
async fn oauth_refresh_failure_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let fixture = oauth_client(&server, Arc::new(RecordingSink::default())).await;

    let err = fixture.client.profile(EMAIL).await.unwrap_err();
    assert!(matches!(err, EsignBridgeError::Auth(_)));

    // A rejected refresh clears both tokens.
    let access = fixture.store.get("mekari:access_token:signer@example.com").await.unwrap();
    assert!(access.is_none());
}
