#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::MockServer;

use rift_console::auth::{issue_session_token, SessionClaims};
use rift_console::config::AppConfig;
use rift_console::database::{BindingError, BindingStore};
use rift_console::middleware::JwtSessionProvider;
use rift_console::services::BackendClient;
use rift_console::types::{TenantBinding, TenantId};
use rift_console::{router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const API_KEY: &str = "integration-api-key";

/// In-memory binding store with an optional forced failure
#[derive(Default)]
pub struct FakeBindingStore {
    bindings: HashMap<Uuid, Vec<TenantBinding>>,
    fail: bool,
    pub lookups: AtomicUsize,
}

impl FakeBindingStore {
    pub fn with_binding(mut self, principal_id: Uuid, tenant: &str) -> Self {
        self.bindings.entry(principal_id).or_default().push(TenantBinding {
            principal_id,
            tenant_id: TenantId::parse(tenant).expect("tenant id"),
            instance_url: Some("https://acme.my.salesforce.com".to_string()),
            issued_at: Some(Utc::now() - Duration::hours(2)),
        });
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BindingStore for FakeBindingStore {
    async fn find_binding(&self, principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BindingError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        match self.bindings.get(&principal_id).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([binding]) => Ok(Some(binding.clone())),
            Some(many) => Err(BindingError::Ambiguous {
                principal_id,
                count: many.len(),
            }),
        }
    }

    async fn ping(&self) -> Result<(), BindingError> {
        if self.fail {
            Err(BindingError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

pub fn test_config(backend_url: &str) -> AppConfig {
    let mut config = AppConfig::development();
    config.database.url = "postgres://localhost/rift_test".to_string();
    config.backend.base_url = backend_url.to_string();
    config.backend.api_key = API_KEY.to_string();
    config.backend.oauth_base_url = Some("https://rift-backend.example.com".to_string());
    config.auth.jwt_secret = JWT_SECRET.to_string();
    config.auth.login_url = "https://auth.example.com/login".to_string();
    config
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<FakeBindingStore>,
}

pub fn build_app(backend: &MockServer, store: FakeBindingStore) -> TestApp {
    let config = test_config(&backend.uri());
    config.validate().expect("valid test config");

    let store = Arc::new(store);
    let sessions = Arc::new(JwtSessionProvider::new(&config.auth));
    let client = BackendClient::new(&config.backend).expect("backend client");
    let state = AppState::new(config, sessions, store.clone(), client).expect("templates compile");

    TestApp {
        router: router(state),
        store,
    }
}

pub fn token_for(principal_id: Uuid) -> String {
    let claims = SessionClaims::new(
        principal_id.to_string(),
        Some("operator@rift.test".to_string()),
        Duration::hours(1),
    );
    issue_session_token(&claims, JWT_SECRET).expect("session token")
}

pub async fn send(router: &Router, request: Request<Body>) -> Result<Response<Body>> {
    Ok(router.clone().oneshot(request).await?)
}

/// GET as a browser would, authenticated when a principal is given
pub async fn get_html(router: &Router, uri: &str, principal: Option<Uuid>) -> Result<Response<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri).header("accept", "text/html");
    if let Some(id) = principal {
        builder = builder.header("authorization", format!("Bearer {}", token_for(id)));
    }
    send(router, builder.body(Body::empty())?).await
}

pub async fn get_json(router: &Router, uri: &str, principal: Option<Uuid>) -> Result<Response<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri).header("accept", "application/json");
    if let Some(id) = principal {
        builder = builder.header("authorization", format!("Bearer {}", token_for(id)));
    }
    send(router, builder.body(Body::empty())?).await
}

pub async fn body_string(response: Response<Body>) -> Result<String> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response<Body>) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}
