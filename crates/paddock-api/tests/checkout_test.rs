//! End-to-end checkout tests driving the router in-process.
//!
//! The in-memory inventory store stands in for Redis, so the full
//! request path (routing, validation, engine, response shape) runs
//! without external services.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use paddock_auth::gate::StoreTokenGate;
use paddock_auth::lifetime::LifetimePolicy;
use paddock_core::config::AppConfig;
use paddock_core::config::auth::AuthMode;
use paddock_core::config::pools::PoolDefinition;
use paddock_core::traits::inventory::InventoryStore;
use paddock_core::types::machine::fields;
use paddock_engine::catalog::PoolCatalog;
use paddock_engine::checkout::CheckoutEngine;
use paddock_inventory::memory::MemoryInventoryStore;

use paddock_api::state::AppState;

const TOKEN: &str = "abcdefghijklmnopqrstuvwxyz012345";

/// Test application: the real router over an in-memory store.
struct TestApp {
    router: Router,
    store: MemoryInventoryStore,
}

impl TestApp {
    async fn new(mode: AuthMode) -> Self {
        let mut config = AppConfig::default();
        config.pools = vec![
            PoolDefinition {
                name: "pool1".to_string(),
                size: 5,
            },
            PoolDefinition {
                name: "pool2".to_string(),
                size: 10,
            },
        ];
        config
            .aliases
            .insert("poolone".to_string(), "pool1".to_string());
        config.auth.mode = mode;
        config.auth.token_lifetime_hours = 2;
        config.validate().expect("valid test config");

        let store = MemoryInventoryStore::new();
        store.insert_token(TOKEN, "jdoe").await;

        let store_handle: Arc<dyn InventoryStore> = Arc::new(store.clone());
        let catalog = Arc::new(PoolCatalog::from_config(&config));
        let gate = Arc::new(StoreTokenGate::new(store_handle.clone()));
        let policy = LifetimePolicy::new(&config.auth, gate);
        let engine = CheckoutEngine::new(store_handle.clone(), policy);

        let state = AppState::new(Arc::new(config), catalog, engine, store_handle);
        Self {
            router: paddock_api::build_router(state),
            store,
        }
    }

    async fn create_vm(&self, pool: &str, hostname: &str) {
        self.store.add_ready(pool, hostname).await.expect("seed");
        self.store
            .set_machine_field(hostname, fields::POOL, pool)
            .await
            .expect("seed");
        self.store
            .set_machine_field(hostname, fields::STATE, "ready")
            .await
            .expect("seed");
    }

    async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header("X-AUTH-TOKEN", token);
        }
        let request = request
            .body(Body::from(body.to_string()))
            .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

#[tokio::test]
async fn returns_a_single_vm() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, body) = app.post("/api/v1/vm", json!({"pool1": "1"}), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"ok": true, "pool1": {"hostname": "abcdefghijklmnop"}})
    );
    assert_eq!(app.store.ready_count("pool1").await.expect("count"), 0);
}

#[tokio::test]
async fn returns_a_single_vm_for_an_alias() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, body) = app.post("/api/v1/vm", json!({"poolone": "1"}), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"ok": true, "poolone": {"hostname": "abcdefghijklmnop"}})
    );
}

#[tokio::test]
async fn fails_on_nonexistent_pools() {
    let app = TestApp::new(AuthMode::Disabled).await;

    let (status, body) = app
        .post("/api/v1/vm", json!({"poolpoolpool": "1"}), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn mixed_request_allocates_nothing() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, body) = app
        .post(
            "/api/v1/vm",
            json!({"pool1": "1", "poolpoolpool": "1"}),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], json!(false));
    // The valid pool's ready set is untouched.
    assert_eq!(app.store.ready_count("pool1").await.expect("count"), 1);
}

#[tokio::test]
async fn returns_multiple_vms() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;
    app.create_vm("pool2", "qrstuvwxyz012345").await;

    let (status, body) = app
        .post("/api/v1/vm", json!({"pool1": "1", "pool2": "1"}), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ok": true,
            "pool1": {"hostname": "abcdefghijklmnop"},
            "pool2": {"hostname": "qrstuvwxyz012345"}
        })
    );
}

#[tokio::test]
async fn path_form_checks_out_joined_pools() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;
    app.create_vm("pool2", "qrstuvwxyz012345").await;

    let (status, body) = app
        .post("/api/v1/vm/pool1+pool2", Value::Null, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["pool1"]["hostname"], json!("abcdefghijklmnop"));
    assert_eq!(body["pool2"]["hostname"], json!("qrstuvwxyz012345"));
}

#[tokio::test]
async fn drained_pool_returns_service_unavailable() {
    let app = TestApp::new(AuthMode::Disabled).await;

    let (status, body) = app.post("/api/v1/vm", json!({"pool1": "1"}), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = TestApp::new(AuthMode::Disabled).await;

    // Wrong top-level shape fails Json extraction but still gets the
    // regular error envelope.
    let (status, body) = app.post("/api/v1/vm", json!(["pool1"]), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));

    // Unparseable count fails request validation.
    let (status, body) = app.post("/api/v1/vm", json!({"pool1": "zero"}), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn auth_disabled_does_not_extend_lifetime() {
    let app = TestApp::new(AuthMode::Disabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, body) = app
        .post("/api/v1/vm", json!({"pool1": "1"}), Some(TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"ok": true, "pool1": {"hostname": "abcdefghijklmnop"}})
    );
    let lifetime = app
        .store
        .machine_field("abcdefghijklmnop", fields::LIFETIME)
        .await
        .expect("field");
    assert_eq!(lifetime, None);
}

#[tokio::test]
async fn auth_enabled_extends_lifetime_with_token() {
    let app = TestApp::new(AuthMode::Enabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, _) = app
        .post("/api/v1/vm", json!({"pool1": "1"}), Some(TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    let lifetime = app
        .store
        .machine_field("abcdefghijklmnop", fields::LIFETIME)
        .await
        .expect("field");
    assert_eq!(lifetime.as_deref(), Some("2"));
}

#[tokio::test]
async fn auth_enabled_without_token_does_not_extend_lifetime() {
    let app = TestApp::new(AuthMode::Enabled).await;
    app.create_vm("pool1", "abcdefghijklmnop").await;

    let (status, _) = app.post("/api/v1/vm", json!({"pool1": "1"}), None).await;

    assert_eq!(status, StatusCode::OK);
    let lifetime = app
        .store
        .machine_field("abcdefghijklmnop", fields::LIFETIME)
        .await
        .expect("field");
    assert_eq!(lifetime, None);
}

#[tokio::test]
async fn lists_configured_pools() {
    let app = TestApp::new(AuthMode::Disabled).await;

    let (status, body) = app.get("/api/v1/vm").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "pools": ["pool1", "pool2"]}));
}

#[tokio::test]
async fn health_reports_store_reachable() {
    let app = TestApp::new(AuthMode::Disabled).await;

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["store"], json!(true));
}
