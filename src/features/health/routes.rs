use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::files::repositories::FileRepository;
use crate::features::health::handlers::{api_info, health_check};

/// Root banner and health check
pub fn routes(repository: Arc<dyn FileRepository>) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health_check))
        .with_state(repository)
}
