//! wages-http library - salary calculator web service
//!
//! Serves the drag and drop upload page and computes monthly salaries for
//! uploaded CSV timesheets.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wages_common::csv::CsvFields;
use wages_common::CalculatorSettings;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated calculator settings, immutable for the life of the server
    pub settings: Arc<CalculatorSettings>,
    /// Timesheet column header names
    pub fields: Arc<CsvFields>,
}

impl AppState {
    pub fn new(settings: CalculatorSettings, fields: CsvFields) -> Self {
        Self {
            settings: Arc::new(settings),
            fields: Arc::new(fields),
        }
    }
}

/// Build application router
///
/// `max_upload_bytes` bounds the request body of `POST /calculate`.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    use axum::routing::{get, post};

    let calculate = Router::new()
        .route("/calculate", post(api::calculate))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/js/client-app.js", get(api::serve_app_js))
        .route("/css/app.css", get(api::serve_app_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(calculate)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
