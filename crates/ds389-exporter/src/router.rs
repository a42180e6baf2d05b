//! Axum router wiring.
//!
//! Exposes the metrics route at the configured telemetry path and a small
//! landing page at `/`.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::app_state::AppState;

const CONTENT_TYPE_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn build_router(state: AppState) -> Router {
    let path = state.cfg().web.telemetry_path.clone();
    Router::new()
        .route("/", get(landing))
        .route(&path, get(metrics))
        .with_state(state)
}

async fn metrics(State(app): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)], app.metrics().render())
}

async fn landing(State(app): State<AppState>) -> Html<String> {
    let path = &app.cfg().web.telemetry_path;
    Html(format!(
        "<html>\
         <head><title>389ds Exporter</title></head>\
         <body>\
         <h1>389ds Exporter</h1>\
         <p><a href='{path}'>Metrics</a></p>\
         <h2>Build</h2>\
         <pre>{} {}</pre>\
         </body>\
         </html>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    ))
}
