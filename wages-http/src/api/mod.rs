//! HTTP API handlers for wages-http

pub mod buildinfo;
pub mod calculate;
pub mod health;
pub mod ui;

pub use buildinfo::get_build_info;
pub use calculate::calculate;
pub use health::health_routes;
pub use ui::{serve_app_css, serve_app_js, serve_index};
