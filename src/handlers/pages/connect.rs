use axum::{
    extract::{rejection::FormRejection, Extension, Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::services::backend::onboarding_url;
use crate::state::AppState;
use crate::types::TenantId;
use crate::views::ConnectView;

const NAV: &str = "/connect-salesforce";

#[derive(Debug, Deserialize)]
pub struct ConnectForm {
    #[serde(default)]
    pub tenant_id: String,
}

/// GET /connect-salesforce - onboarding form
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    if let Err(error) = session.require() {
        return respond::failure(&state, &session, format, NAV, "onboarding", error);
    }
    respond::render(&state, &session, format, StatusCode::OK, ConnectView::default())
}

/// POST /connect-salesforce - hand the browser to the backend's OAuth start endpoint.
/// Token exchange happens entirely on the backend.
///
/// The session is checked before the body, so an unreadable form never hides a missing login.
pub async fn post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
    form: Result<Form<ConnectForm>, FormRejection>,
) -> Response {
    let principal = match session.require() {
        Ok(principal) => principal,
        Err(error) => return respond::failure(&state, &session, format, NAV, "onboarding", error),
    };

    let raw = match form {
        Ok(Form(form)) => form.tenant_id,
        Err(rejection) => {
            tracing::debug!("Unreadable onboarding form: {}", rejection);
            String::new()
        }
    };

    let Some(tenant) = TenantId::parse(&raw) else {
        let view = ConnectView {
            tenant_id: raw,
            error: Some("Please enter a Tenant ID".to_string()),
        };
        return respond::render(&state, &session, format, StatusCode::UNPROCESSABLE_ENTITY, view);
    };

    match onboarding_url(state.config.backend.oauth_base(), &tenant) {
        Ok(url) => {
            tracing::info!(principal = %principal.id, tenant = %tenant, "Starting Salesforce OAuth");
            Redirect::to(url.as_str()).into_response()
        }
        Err(e) => {
            tracing::error!("Cannot build onboarding URL: {}", e);
            let view = ConnectView {
                tenant_id: tenant.to_string(),
                error: Some("Onboarding is not configured correctly".to_string()),
            };
            respond::render(&state, &session, format, StatusCode::INTERNAL_SERVER_ERROR, view)
        }
    }
}
