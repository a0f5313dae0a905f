use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::features::stats::{dtos as stats_dtos, handlers as stats_handlers};
use crate::shared::types::{ApiResponse, ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Files
        files_handlers::upload_file,
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::download_file,
        files_handlers::delete_file,
        // Stats
        stats_handlers::get_stats,
        // Health
        health_handlers::health_check,
        health_handlers::api_info,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::FileDetailDto,
            files_dtos::UploadFileResponseDto,
            files_dtos::FileListDto,
            ApiResponse<files_dtos::FileDetailDto>,
            ApiResponse<files_dtos::FileListDto>,
            // Stats
            stats_dtos::FileStatsDto,
            stats_dtos::LargestFileDto,
            stats_dtos::ExtensionStatDto,
            ApiResponse<stats_dtos::FileStatsDto>,
            // Health
            health_dtos::HealthResponseDto,
            health_dtos::ApiInfoDto,
        )
    ),
    tags(
        (name = "files", description = "File upload, listing, download and deletion"),
        (name = "stats", description = "Aggregate upload statistics"),
        (name = "health", description = "Service health and information"),
    ),
    info(
        title = "File Upload API",
        version = "1.0.0",
        description = "API documentation for the File Upload API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
