//! PDF Logo Replacer
//!
//! HTTP service that composites a replacement logo over caller-reported
//! regions of a PDF and returns the rewritten document.
//!
//! # Modules
//!
//! - `compositor`: Detection to page-space rectangle geometry
//! - `replacement`: Decoding of the base64 replacement logo
//! - `pdf`: Document loading, image embedding, compositing strategies
//! - `service`: One replacement pass over a document
//! - `routes`: axum handlers

pub mod compositor;
pub mod config;
pub mod error;
pub mod pdf;
pub mod replacement;
pub mod routes;
pub mod service;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    // Any origin, method and header; browser extensions call from their own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().limits.max_upload_bytes;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::replace::router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
