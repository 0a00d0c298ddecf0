//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, plus the library
//! surface used directly.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bucket_cache::{
    api::create_router,
    cache::{Namespace, PartitionScope, StaticNamespace},
    AppState, BackingPartition, BucketedCache, Config, MemoryPartition, NamedCacheFacade,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()))
}

fn small_limit_app() -> Router {
    let config = Config {
        item_size_limit: 40,
        ..Config::default()
    };
    create_router(AppState::from_config(&config))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn put_request(scope: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/{}", scope))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_org_success() {
    let app = create_test_app();

    let (status, json) = send(&app, put_request("org", json!({"key": "k", "value": "v"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scope"], "org");
    assert_eq!(json["stored"], true);
    assert_eq!(json["bucket"], 0);
}

#[tokio::test]
async fn test_put_empty_key_rejected() {
    let app = create_test_app();

    let (status, json) = send(&app, put_request("org", json!({"key": "", "value": 1}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_put_malformed_json() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/session")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_put_spills_into_new_bucket() {
    let app = small_limit_app();
    let value = "a".repeat(10);

    for key in ["k1", "k2"] {
        let (_, json) = send(&app, put_request("org", json!({"key": key, "value": value}))).await;
        assert_eq!(json["bucket"], 0);
    }
    let (_, json) = send(&app, put_request("org", json!({"key": "k3", "value": value}))).await;
    assert_eq!(json["bucket"], 1);

    let (_, stats) = send(&app, get_request("/stats")).await;
    assert_eq!(stats["org"]["buckets"], 2);
    assert_eq!(stats["org"]["overflows"], 1);
}

#[tokio::test]
async fn test_put_oversized_value_dropped() {
    let app = small_limit_app();

    let body = json!({"key": "big", "value": "x".repeat(100)});
    let (status, json) = send(&app, put_request("session", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], false);
    assert!(json["bucket"].is_null());

    let (status, _) = send(&app, get_request("/get/big")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_session_shadows_org() {
    let app = create_test_app();
    send(&app, put_request("org", json!({"key": "k", "value": "O"}))).await;
    send(&app, put_request("session", json!({"key": "k", "value": "S"}))).await;

    let (status, json) = send(&app, get_request("/get/k")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "S");
}

#[tokio::test]
async fn test_get_falls_back_to_org() {
    let app = create_test_app();
    send(&app, put_request("org", json!({"key": "k", "value": {"n": [1, 2]}}))).await;

    let (status, json) = send(&app, get_request("/get/k")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], json!({"n": [1, 2]}));
}

#[tokio::test]
async fn test_get_missing_key() {
    let app = create_test_app();

    let (status, json) = send(&app, get_request("/get/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_contains_endpoint() {
    let app = create_test_app();
    send(&app, put_request("session", json!({"key": "k", "value": true}))).await;

    let (_, json) = send(&app, get_request("/contains/k")).await;
    assert_eq!(json["present"], true);

    let (_, json) = send(&app, get_request("/contains/other")).await;
    assert_eq!(json["present"], false);
}

// == Reload / Stats / Health ==

#[tokio::test]
async fn test_reload_endpoint_keeps_entries() {
    let app = create_test_app();
    send(&app, put_request("org", json!({"key": "a", "value": 1}))).await;
    send(&app, put_request("session", json!({"key": "b", "value": 2}))).await;

    let request = Request::builder()
        .method("POST")
        .uri("/reload")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["org"]["entries"], 1);
    assert_eq!(json["session"]["entries"], 1);

    let (status, _) = send(&app, get_request("/get/b")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_cache() {
    let config = Config {
        cache_enabled: false,
        ..Config::default()
    };
    let app = create_router(AppState::from_config(&config));

    let (status, json) = send(&app, put_request("org", json!({"key": "k", "value": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], false);

    let (_, stats) = send(&app, get_request("/stats")).await;
    assert_eq!(stats["org"]["skipped"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/unknown")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Library Surface ==

#[test]
fn test_caches_share_partition_across_instances() {
    let partition = MemoryPartition::new("local.sharedOrg", 64);
    let mut writer = BucketedCache::new(partition.clone());
    writer.put("a", json!(1)).put("b", json!("two"));

    let reader = BucketedCache::new(partition);

    assert_eq!(reader.get("b"), Some(&json!("two")));
    assert_eq!(reader.bucket_count(), writer.bucket_count());
}

#[test]
fn test_unavailable_partition_hides_other_instances_writes() {
    let partition = MemoryPartition::new("local.sharedSession", 64);
    BucketedCache::new(partition.clone()).put("k", json!(1));
    partition.set_available(false);

    let mut cache = BucketedCache::new(partition);
    cache.put("k2", json!(2));

    assert!(!cache.contains("k"));
    assert!(cache.get("k2").is_none());
}

#[test]
fn test_facade_over_custom_partitions() {
    let namespace = Namespace::resolve(&StaticNamespace(Some("acme".to_string())));
    let org = MemoryPartition::new(namespace.qualify(PartitionScope::Org, "app"), 256);
    let session = MemoryPartition::new(namespace.qualify(PartitionScope::Session, "app"), 256);
    assert_eq!(org.name(), "acme.appOrg");

    let mut facade = NamedCacheFacade::new(BucketedCache::new(org), BucketedCache::new(session));
    facade.org_mut().put("k", json!("O"));
    assert_eq!(facade.get("k"), Some(&json!("O")));

    facade.session_mut().put("k", json!("S"));
    assert_eq!(facade.get("k"), Some(&json!("S")));
    assert!(facade.contains("k"));
}
