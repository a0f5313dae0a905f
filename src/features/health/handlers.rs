use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::features::files::repositories::FileRepository;
use crate::features::health::dtos::{ApiInfoDto, HealthResponseDto};
use crate::shared::constants::{API_V1_PREFIX, API_VERSION};

/// Health check: succeeds when the database answers a trivial query
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponseDto),
        (status = 503, description = "Database unreachable", body = HealthResponseDto)
    )
)]
pub async fn health_check(
    State(repository): State<Arc<dyn FileRepository>>,
) -> (StatusCode, Json<HealthResponseDto>) {
    match repository.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponseDto {
                status: "ok".to_string(),
                message: "API is healthy".to_string(),
                version: API_VERSION.to_string(),
                timestamp: Utc::now(),
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponseDto {
                    status: "error".to_string(),
                    message: "Database connection failed".to_string(),
                    version: API_VERSION.to_string(),
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API information", body = ApiInfoDto)
    )
)]
pub async fn api_info() -> Json<ApiInfoDto> {
    Json(ApiInfoDto {
        message: "File Upload API".to_string(),
        version: API_VERSION.to_string(),
        docs: API_V1_PREFIX.to_string(),
        health: "/health".to_string(),
    })
}
