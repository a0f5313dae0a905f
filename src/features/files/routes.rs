use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_file, get_file, list_files, upload_file,
};
use crate::features::files::services::FileService;

/// Create routes for the files feature.
///
/// `upload_body_limit` caps the upload request body in bytes.
pub fn routes(file_service: Arc<FileService>, upload_body_limit: usize) -> Router {
    let body_limit = DefaultBodyLimit::max(upload_body_limit);

    Router::new()
        .route("/api/v1/files/upload", post(upload_file).layer(body_limit))
        .route("/api/v1/files", get(list_files))
        .route("/api/v1/files/{id}", get(get_file).delete(delete_file))
        .route("/api/v1/files/{id}/download", get(download_file))
        .with_state(file_service)
}
