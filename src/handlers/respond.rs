// Turns page results into HTML or JSON responses
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use handlebars::RenderError;

use crate::error::ConsoleError;
use crate::middleware::{ApiResponse, PageFormat, Session};
use crate::services::{GateOutcome, GateRun};
use crate::state::AppState;
use crate::views::Page;

fn document(status: StatusCode, rendered: Result<String, RenderError>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

pub fn render<P: Page>(state: &AppState, session: &Session, format: PageFormat, status: StatusCode, page: P) -> Response {
    match format {
        PageFormat::Json => ApiResponse::with_status(page, status).into_response(),
        PageFormat::Html => document(status, state.pages.page(&page, session.principal())),
    }
}

/// Inline error in place of the page body
pub fn failure(
    state: &AppState,
    session: &Session,
    format: PageFormat,
    nav: &'static str,
    context: &str,
    error: ConsoleError,
) -> Response {
    match format {
        PageFormat::Json => error.into_response(),
        PageFormat::Html => {
            let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let rendered = state.pages.error(
                nav,
                context,
                &error,
                &state.config.auth.login_url,
                session.principal(),
            );
            document(status, rendered)
        }
    }
}

/// Browsers follow the onboarding redirect; JSON callers get `TenantAbsent` with the path instead
pub fn gated<P: Page>(
    state: &AppState,
    session: &Session,
    format: PageFormat,
    nav: &'static str,
    context: &str,
    run: GateRun<P>,
) -> Response {
    match (run.outcome, format) {
        (GateOutcome::Success(page), _) => render(state, session, format, StatusCode::OK, page),
        (GateOutcome::Error(error), _) => failure(state, session, format, nav, context, error),
        (GateOutcome::Redirecting(target), PageFormat::Html) => Redirect::to(&target).into_response(),
        (GateOutcome::Redirecting(target), PageFormat::Json) => {
            ConsoleError::TenantAbsent { onboarding_path: target }.into_response()
        }
    }
}
