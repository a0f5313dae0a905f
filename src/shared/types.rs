use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
        }
    }
}

/// Body for endpoints that only report an outcome
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
    /// Id of the already stored file, set on duplicate uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
}

impl ErrorResponse {
    pub fn new(message: String, file_id: Option<i64>) -> Self {
        Self {
            error: true,
            message,
            file_id,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset pagination query parameters.
///
/// Values are kept as raw strings so that malformed input falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Number of items to return (1-100, default: 10)
    #[param(value_type = Option<i64>, minimum = 1, maximum = 100)]
    pub limit: Option<String>,

    /// Number of items to skip (default: 0)
    #[param(value_type = Option<i64>, minimum = 0)]
    pub offset: Option<String>,
}

impl PaginationQuery {
    /// Parsed limit; anything outside [1, MAX_PAGE_SIZE] becomes DEFAULT_PAGE_SIZE
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Parsed offset; negative or malformed values become 0
    pub fn offset(&self) -> i64 {
        self.offset
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|o| *o >= 0)
            .unwrap_or(0)
    }
}
