use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::stats::dtos::FileStatsDto;
use crate::features::stats::services::StatsService;
use crate::shared::types::{ApiResponse, ErrorResponse};

/// Get aggregate upload statistics
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Upload statistics", body = ApiResponse<FileStatsDto>),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_stats(
    State(service): State<Arc<StatsService>>,
) -> Result<Json<ApiResponse<FileStatsDto>>, AppError> {
    let stats = service.get_stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}
