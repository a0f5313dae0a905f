use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::FileRecord;
use crate::shared::constants::API_V1_PREFIX;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Public projection of a stored file
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: i64,
    /// Original filename as uploaded
    pub name: String,
    /// Size of the file in bytes
    pub size: i64,
    pub mime_type: String,
    /// Lower-cased extension including the leading dot
    pub extension: String,
    /// Hex encoded SHA-256 of the content
    pub hash: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&FileRecord> for FileResponseDto {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id,
            name: file.original_name.clone(),
            size: file.size_bytes,
            mime_type: file.mime_type.clone(),
            extension: file.extension.clone(),
            hash: file.content_hash.clone(),
            uploaded_at: file.uploaded_at,
        }
    }
}

/// File projection with its download link, used by list and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileDetailDto {
    #[serde(flatten)]
    pub file: FileResponseDto,
    pub download_url: String,
}

impl From<&FileRecord> for FileDetailDto {
    fn from(file: &FileRecord) -> Self {
        Self {
            file: FileResponseDto::from(file),
            download_url: download_url(file.id),
        }
    }
}

pub fn download_url(id: i64) -> String {
    format!("{}/files/{}/download", API_V1_PREFIX, id)
}

/// Response body for a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponseDto {
    pub success: bool,
    pub message: String,
    pub file: FileResponseDto,
}

/// Paginated file listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListDto {
    pub files: Vec<FileDetailDto>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
