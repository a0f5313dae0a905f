use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::files::dtos::{
    FileDetailDto, FileListDto, FileResponseDto, UploadFileDto, UploadFileResponseDto,
};
use crate::features::files::services::FileService;
use crate::modules::storage::sanitize_file_name;
use crate::shared::types::{ApiResponse, ErrorResponse, MessageResponse, PaginationQuery};

/// Parse a path id; anything that is not a non-negative integer is a client error
fn parse_file_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid file ID".to_string()))
}

/// Map a multipart read failure; an exceeded body limit keeps its 413 status
fn multipart_read_error(err: MultipartError, context: &str) -> AppError {
    debug!("{}: {}", context, err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(
            "Request body exceeds maximum allowed size".to_string(),
        );
    }
    AppError::BadRequest(format!("{}: {}", context, err))
}

/// Build a Content-Disposition value for an untrusted file name
fn content_disposition_header(filename: &str) -> String {
    // Sanitize filename for the basic filename parameter (ASCII fallback)
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && sanitized == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // RFC 5987 filename* parameter carries the exact UTF-8 name
    let encoded = urlencoding::encode(filename);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` part.
#[utoipa::path(
    post,
    path = "/api/v1/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = UploadFileResponseDto),
        (status = 400, description = "Missing file or upload policy violation", body = ErrorResponse),
        (status = 409, description = "Identical content already stored", body = ErrorResponse),
        (status = 413, description = "Request body exceeds the configured limit", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadFileResponseDto>), AppError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected multipart body: {}", e);
        AppError::BadRequest("No file uploaded".to_string())
    })?;

    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_read_error(e, "Failed to read multipart data"))?
    {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        // A part without a filename is a plain form value, not a file
        let Some(file_name) = field.file_name().map(sanitize_file_name) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_read_error(e, "Failed to read file data"))?;

        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let file = service.upload_file(&file_name, &data).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadFileResponseDto {
            success: true,
            message: "File uploaded successfully".to_string(),
            file: FileResponseDto::from(&file),
        }),
    ))
}

/// List files, newest first
#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated file list", body = ApiResponse<FileListDto>),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<FileListDto>>, AppError> {
    let (limit, offset) = (query.limit(), query.offset());
    let (files, total) = service.list_files(limit, offset).await?;

    Ok(Json(ApiResponse::success(
        Some(FileListDto {
            files: files.iter().map(FileDetailDto::from).collect(),
            total,
            limit,
            offset,
        }),
        None,
    )))
}

/// Get file details
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File details", body = ApiResponse<FileDetailDto>),
        (status = 400, description = "Invalid file ID", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileDetailDto>>, AppError> {
    let id = parse_file_id(&id)?;
    let file = service.get_file(id).await?;
    Ok(Json(ApiResponse::success(
        Some(FileDetailDto::from(&file)),
        None,
    )))
}

/// Download file content
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}/download",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file ID", body = ErrorResponse),
        (status = 404, description = "File record or stored bytes not found", body = ErrorResponse)
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_file_id(&id)?;
    let (file, handle) = service.open_file(id).await?;

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition_header(&file.original_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header("Content-Description", "File Transfer")
        .header("Content-Transfer-Encoding", "binary")
        .body(Body::from_stream(ReaderStream::new(handle)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

/// Delete a file
///
/// Removes the stored bytes (best effort) and soft-deletes the record.
#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = MessageResponse),
        (status = 400, description = "Invalid file ID", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_file_id(&id)?;
    service.delete_file(id).await?;

    Ok(Json(MessageResponse::success("File deleted successfully")))
}
