use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Response,
};

use crate::handlers::respond;
use crate::middleware::{PageFormat, Session};
use crate::state::AppState;
use crate::views::SettingsView;

/// GET /settings
pub async fn get(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    format: PageFormat,
) -> Response {
    match session.require() {
        Ok(principal) => respond::render(&state, &session, format, StatusCode::OK, SettingsView::build(principal)),
        Err(error) => respond::failure(&state, &session, format, "/settings", "settings", error),
    }
}
