//! UI serving routes
//!
//! The page and its assets are compiled into the binary. Responses are marked
//! private and uncached so a redeployed server is picked up on reload.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/client-app.js");
const APP_CSS: &str = include_str!("../ui/app.css");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "private"),
            (header::PRAGMA, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// GET /
pub async fn serve_index() -> Response {
    asset("text/html; charset=utf-8", INDEX_HTML)
}

/// GET /js/client-app.js
pub async fn serve_app_js() -> Response {
    asset("application/javascript; charset=utf-8", APP_JS)
}

/// GET /css/app.css
pub async fn serve_app_css() -> Response {
    asset("text/css; charset=utf-8", APP_CSS)
}
