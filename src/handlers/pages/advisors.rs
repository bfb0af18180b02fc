use axum::{
    extract::{Extension, State},
    response::Response,
};

use crate::error::ConsoleError;
use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::AdvisorsView;

/// GET /advisors
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    let backend = &state.backend;
    let run = state
        .gate()
        .run(session.principal(), |scope| async move {
            let advisors = backend.advisors(&scope).await?;
            Ok::<_, ConsoleError>(AdvisorsView::build(&advisors))
        })
        .await;

    respond::gated(&state, &session, format, "/advisors", "advisors", run)
}
