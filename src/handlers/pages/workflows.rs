use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Response,
};

use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::WorkflowsView;

/// GET /workflows - placeholder until workflow automation ships
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    match session.require() {
        Ok(_) => respond::render(&state, &session, format, StatusCode::OK, WorkflowsView::default()),
        Err(error) => respond::failure(&state, &session, format, "/workflows", "workflows", error),
    }
}
