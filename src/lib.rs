pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod submission;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::{build_mailer, Dispatcher, Mailer};
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Router {
    let mailer = build_mailer(&config);
    build_app_with_mailer(config, mailer)
}

/// Assemble the router around an explicit mail backend. Tests inject a
/// capturing backend here; `None` models a missing transport configuration.
pub fn build_app_with_mailer(config: Config, mailer: Option<Arc<dyn Mailer>>) -> Router {
    let dispatcher = mailer.map(|m| {
        Dispatcher::new(
            m,
            config.operator_email.clone(),
            config.delivery_policy.clone(),
        )
    });

    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState { config, dispatcher });

    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
