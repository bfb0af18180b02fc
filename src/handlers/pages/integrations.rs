use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;

use crate::error::ConsoleError;
use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::IntegrationsView;

/// GET /integrations - the principal's CRM binding, read straight from the binding store.
/// Not gated: having no integration is a normal state here, shown as the empty state.
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    let principal = match session.require() {
        Ok(principal) => principal,
        Err(error) => return respond::failure(&state, &session, format, "/integrations", "integrations", error),
    };

    match state.bindings.find_binding(principal.id).await {
        Ok(binding) => {
            let view = IntegrationsView::build(binding.as_ref(), Utc::now());
            respond::render(&state, &session, format, StatusCode::OK, view)
        }
        Err(err) => {
            let error = ConsoleError::from(err);
            respond::failure(&state, &session, format, "/integrations", "integrations", error)
        }
    }
}
