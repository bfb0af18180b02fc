use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{health, pages};
use crate::middleware::session_middleware;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::get))
        // Session-aware pages
        .merge(page_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.security) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Tenant-scoped (gated)
        .route("/dashboard", get(pages::dashboard::get))
        .route("/clients", get(pages::clients::list))
        .route("/clients/:id", get(pages::clients::show))
        .route("/advisors", get(pages::advisors::list))
        .route("/activity", get(pages::activity::list))
        // Session only
        .route("/integrations", get(pages::integrations::list))
        .route(
            "/connect-salesforce",
            get(pages::connect::get).post(pages::connect::post),
        )
        .route("/workflows", get(pages::workflows::get))
        .route("/settings", get(pages::settings::get))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
