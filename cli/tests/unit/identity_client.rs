//! `KeystoneClient` against a stub identity service.

#![allow(clippy::expect_used)]

use std::time::Duration;

use alamo_cli::application::ports::IdentityService;
use alamo_cli::domain::{AuthError, HttpSettings, Secret, TenantCredentials};
use alamo_cli::infra::http::build_client;
use alamo_cli::infra::identity::KeystoneClient;

use crate::helpers::{Route, StubServer};

const ACCESS: &str = r#"{
    "access": {
        "token": {"id": "tok-1", "expires": "2030-01-01T00:00:00Z", "tenant": {"id": "t-1"}},
        "serviceCatalog": [
            {"type": "compute", "endpoints": [
                {"region": "RegionOne", "publicURL": "{base}/v2/t-1/"},
                {"region": "RegionTwo", "publicURL": "{base}/two/t-1"}
            ]}
        ]
    }
}"#;

fn tenant(auth_url: String, region: Option<&str>) -> TenantCredentials {
    TenantCredentials {
        auth_url,
        username: "ops".to_string(),
        password: Secret::new("s3cret"),
        tenant_name: "web".to_string(),
        region: region.map(String::from),
    }
}

fn client() -> KeystoneClient {
    let http = build_client(HttpSettings {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    })
    .expect("client");
    KeystoneClient::new(http)
}

#[tokio::test]
async fn test_resolve_returns_endpoint_and_token() {
    let stub = StubServer::start(vec![Route::new("POST", "/v2.0/tokens", 200, ACCESS)]).await;

    let (endpoint, credentials) = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), None))
        .await
        .expect("resolve");

    assert_eq!(endpoint.base_url(), format!("{}/v2/t-1", stub.base_url()));
    assert_eq!(credentials.token.expose(), "tok-1");
    assert_eq!(credentials.tenant_id.as_deref(), Some("t-1"));
    assert!(credentials.expires.is_some());

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let body = requests[0].json();
    assert_eq!(body["auth"]["passwordCredentials"]["username"], "ops");
    assert_eq!(body["auth"]["passwordCredentials"]["password"], "s3cret");
    assert_eq!(body["auth"]["tenantName"], "web");
}

#[tokio::test]
async fn test_resolve_honours_region() {
    let stub = StubServer::start(vec![Route::new("POST", "/v2.0/tokens", 200, ACCESS)]).await;

    let (endpoint, _) = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), Some("RegionTwo")))
        .await
        .expect("resolve");

    assert_eq!(endpoint.base_url(), format!("{}/two/t-1", stub.base_url()));
}

#[tokio::test]
async fn test_offsetless_expiry_does_not_reject_valid_credentials() {
    let body = ACCESS.replace("2030-01-01T00:00:00Z", "2030-01-01T00:00:00");
    let stub = StubServer::start(vec![Route::new("POST", "/v2.0/tokens", 200, &body)]).await;

    let (endpoint, credentials) = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), None))
        .await
        .expect("resolve");

    assert!(!endpoint.base_url().is_empty());
    assert_eq!(credentials.token.expose(), "tok-1");
    assert!(credentials.expires.is_some());
}

#[tokio::test]
async fn test_rejected_credentials_fail_with_auth_error() {
    let stub = StubServer::start(vec![Route::new(
        "POST",
        "/v2.0/tokens",
        401,
        r#"{"error":{"message":"Invalid user / password"}}"#,
    )])
    .await;

    let err = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), None))
        .await
        .expect_err("should be rejected");

    match err.downcast_ref::<AuthError>() {
        Some(AuthError::Rejected { status, body }) => {
            assert_eq!(*status, 401);
            assert!(body.contains("Invalid user"));
        }
        other => panic!("expected AuthError::Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_compute_entry_fails() {
    let stub = StubServer::start(vec![Route::new(
        "POST",
        "/v2.0/tokens",
        200,
        r#"{"access":{"token":{"id":"tok-1"},"serviceCatalog":[]}}"#,
    )])
    .await;

    let err = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), None))
        .await
        .expect_err("no compute endpoint");

    assert!(matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::MissingCatalogEntry { .. })
    ));
}

#[tokio::test]
async fn test_unknown_region_fails() {
    let stub = StubServer::start(vec![Route::new("POST", "/v2.0/tokens", 200, ACCESS)]).await;

    let err = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), Some("Mars")))
        .await
        .expect_err("no endpoint in region");

    assert!(err.to_string().contains("region 'Mars'"));
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let stub = StubServer::start(vec![Route::new("POST", "/v2.0/tokens", 200, "not json")]).await;

    let err = client()
        .resolve(&tenant(format!("{}/v2.0", stub.base_url()), None))
        .await
        .expect_err("malformed");

    assert!(matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_unreachable_identity_service() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };

    let err = client()
        .resolve(&tenant(format!("http://{addr}/v2.0"), None))
        .await
        .expect_err("unreachable");

    assert!(matches!(
        err.downcast_ref::<AuthError>(),
        Some(AuthError::Unreachable { .. })
    ));
}
