use axum::{
    extract::{Extension, State},
    response::Response,
};
use chrono::Utc;

use crate::error::ConsoleError;
use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::DashboardView;

/// GET /dashboard - tenant overview.
///
/// Tenant info, clients and service requests are independent; they are awaited one
/// after another and any failure fails the page.
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    let backend = &state.backend;
    let run = state
        .gate()
        .run(session.principal(), |scope| async move {
            let info = backend.tenant_info(&scope).await?;
            let clients = backend.clients(&scope).await?;
            let requests = backend.service_requests(&scope).await?;
            Ok::<_, ConsoleError>(DashboardView::build(&scope, &info, &clients, &requests, Utc::now()))
        })
        .await;

    respond::gated(&state, &session, format, "/dashboard", "dashboard", run)
}
