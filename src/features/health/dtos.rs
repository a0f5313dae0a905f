use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    /// "ok" or "error"
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Service banner served at the root path
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoDto {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}
