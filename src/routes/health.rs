//! Service descriptor and health check endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "pdf-logo-replacer";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    #[serde(rename = "/replace-logos")]
    pub replace_logos: &'static str,
    #[serde(rename = "/health")]
    pub health: &'static str,
}

pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        service: "PDF Logo Replacer API",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            replace_logos: "POST - Replace logos in PDF",
            health: "GET - Health check",
        },
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
