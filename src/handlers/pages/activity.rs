use axum::{
    extract::{Extension, State},
    response::Response,
};
use chrono::Utc;

use crate::error::ConsoleError;
use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::ActivityView;

/// GET /activity - newest entries first, capped at `ACTIVITY_LIMIT`
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    let backend = &state.backend;
    let run = state
        .gate()
        .run(session.principal(), |scope| async move {
            let entries = backend.activity(&scope).await?;
            Ok::<_, ConsoleError>(ActivityView::build(&entries, Utc::now()))
        })
        .await;

    respond::gated(&state, &session, format, "/activity", "activity", run)
}
