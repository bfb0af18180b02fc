// Console error taxonomy
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::BindingError;
use crate::services::backend::FetchError;
use crate::services::tenant_resolver::public_reason;

/// Page-level failures. Every variant is rendered inline; none are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    // 401 - no principal on the request
    #[error("Not authenticated")]
    AuthenticationAbsent,

    // 409 - principal has no tenant binding; JSON callers get this instead of the redirect
    #[error("No Salesforce tenant is connected for this account")]
    TenantAbsent { onboarding_path: String },

    // 503 - binding lookup itself failed
    #[error("Tenant lookup failed: {0}")]
    TenantLookupFailed(String),

    // 502 - downstream backend failed or returned garbage
    #[error("{reason}")]
    DataFetchFailed { status: Option<u16>, reason: String },
}

impl ConsoleError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ConsoleError::AuthenticationAbsent => 401,
            ConsoleError::TenantAbsent { .. } => 409,
            ConsoleError::TenantLookupFailed(_) => 503,
            ConsoleError::DataFetchFailed { .. } => 502,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ConsoleError::AuthenticationAbsent => "AUTHENTICATION_ABSENT",
            ConsoleError::TenantAbsent { .. } => "TENANT_ABSENT",
            ConsoleError::TenantLookupFailed(_) => "TENANT_LOOKUP_FAILED",
            ConsoleError::DataFetchFailed { .. } => "DATA_FETCH_FAILED",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": true,
            "message": self.to_string(),
            "code": self.error_code()
        });

        match self {
            ConsoleError::DataFetchFailed { status: Some(status), .. } => {
                body["upstream_status"] = json!(status);
            }
            ConsoleError::TenantAbsent { onboarding_path } => {
                body["onboarding_path"] = json!(onboarding_path);
            }
            _ => {}
        }

        body
    }

    pub fn data_fetch_failed(status: Option<u16>, reason: impl Into<String>) -> Self {
        ConsoleError::DataFetchFailed {
            status,
            reason: reason.into(),
        }
    }

    pub fn tenant_lookup_failed(reason: impl Into<String>) -> Self {
        ConsoleError::TenantLookupFailed(reason.into())
    }
}

impl From<BindingError> for ConsoleError {
    fn from(err: BindingError) -> Self {
        // Log the real error but surface a generic reason
        tracing::error!("Tenant lookup error: {}", err);
        ConsoleError::TenantLookupFailed(public_reason(&err))
    }
}

impl From<FetchError> for ConsoleError {
    fn from(err: FetchError) -> Self {
        let status = err.status();
        ConsoleError::data_fetch_failed(status, err.to_string())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ConsoleError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
