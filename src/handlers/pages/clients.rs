use axum::{
    extract::{Extension, Path, State},
    response::Response,
};

use crate::error::ConsoleError;
use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::{ClientDetailView, ClientsView};

/// GET /clients - CRM contacts for the operator's tenant
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    let backend = &state.backend;
    let run = state
        .gate()
        .run(session.principal(), |scope| async move {
            let clients = backend.clients(&scope).await?;
            tracing::debug!(tenant = %scope.tenant_id(), count = clients.len(), "Loaded clients");
            Ok::<_, ConsoleError>(ClientsView::build(&clients))
        })
        .await;

    respond::gated(&state, &session, format, "/clients", "clients", run)
}

/// GET /clients/:id - single contact with its extra CRM fields
pub async fn show(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    format: PageFormat,
) -> Response {
    let backend = &state.backend;
    let client_id = id.as_str();
    let run = state
        .gate()
        .run(session.principal(), |scope| async move {
            let client = backend.client(&scope, client_id).await?;
            Ok::<_, ConsoleError>(ClientDetailView::build(&scope, &client))
        })
        .await;

    respond::gated(&state, &session, format, "/clients", "client", run)
}
