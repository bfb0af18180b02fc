//! HTTP client for the tenant-scoped data backend (the Salesforce proxy).

pub mod models;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;
use crate::types::{TenantId, TenantScope};

pub use models::{ActivityEntry, CrmAdvisor, CrmClient, ServiceRequest, TenantInfo, Validate};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("backend responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("malformed response from {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Upstream HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Arc<str>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: Arc::from(config.api_key.as_str()),
        })
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, scope: &TenantScope, segments: &[&str]) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let tenant = scope.tenant_id();

        tracing::debug!(tenant = %tenant, path = %path, "Backend GET");

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &*self.api_key)
            .header(TENANT_HEADER, tenant.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(tenant = %tenant, path = %path, status = status.as_u16(), "Backend request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: upstream_message(status, &body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let value: T = serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        value
            .validate()
            .map_err(|reason| FetchError::Malformed { path, reason })?;

        Ok(value)
    }

    /// GET /clients
    pub async fn clients(&self, scope: &TenantScope) -> Result<Vec<CrmClient>, FetchError> {
        self.get_json(scope, &["clients"]).await
    }

    /// GET /clients/{id}
    pub async fn client(&self, scope: &TenantScope, id: &str) -> Result<CrmClient, FetchError> {
        self.get_json(scope, &["clients", id]).await
    }

    /// GET /advisors
    pub async fn advisors(&self, scope: &TenantScope) -> Result<Vec<CrmAdvisor>, FetchError> {
        self.get_json(scope, &["advisors"]).await
    }

    /// GET /activity
    pub async fn activity(&self, scope: &TenantScope) -> Result<Vec<ActivityEntry>, FetchError> {
        self.get_json(scope, &["activity"]).await
    }

    /// GET /service-requests
    pub async fn service_requests(&self, scope: &TenantScope) -> Result<Vec<ServiceRequest>, FetchError> {
        self.get_json(scope, &["service-requests"]).await
    }

    /// GET /tenants/{id}/info
    pub async fn tenant_info(&self, scope: &TenantScope) -> Result<TenantInfo, FetchError> {
        let tenant = scope.tenant_id().as_str().to_string();
        self.get_json(scope, &["tenants", &tenant, "info"]).await
    }
}

/// Prefer the backend's own `error`/`message` field, else the status reason
fn upstream_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}

/// `{oauth_base}/oauth/salesforce/start?tenantId=<id>`
pub fn onboarding_url(oauth_base: &str, tenant: &TenantId) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(oauth_base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["oauth", "salesforce", "start"]);
    url.query_pairs_mut().clear().append_pair("tenantId", tenant.as_str());
    Ok(url)
}
