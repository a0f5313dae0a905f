use axum::Router;
use std::sync::Arc;

use crate::core::config::UploadConfig;
use crate::features::files::{self, FileRepository, FileService};
use crate::features::{health, stats};
use crate::modules::storage::LocalStorage;
use crate::shared::validation::UploadPolicy;

/// Wire services over `repository` and return the API router without
/// cross-cutting layers.
pub fn api_router(repository: Arc<dyn FileRepository>, upload: &UploadConfig) -> Router {
    let file_service = Arc::new(FileService::new(
        Arc::clone(&repository),
        LocalStorage::new(upload.upload_dir.clone()),
        UploadPolicy::from_config(upload),
    ));
    let stats_service = Arc::new(stats::StatsService::new(Arc::clone(&repository)));

    Router::new()
        .merge(files::routes(file_service, upload.upload_body_limit()))
        .merge(stats::routes(stats_service))
        .merge(health::routes(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryFileRepository;
    use axum::http::{header, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const CONTENT_37: &[u8] = b"The quick brown fox jumps over a dog.";

    struct TestApp {
        server: TestServer,
        repo: Arc<InMemoryFileRepository>,
        upload_dir: PathBuf,
        _dir: TempDir,
    }

    fn test_app(max_file_size: u64, allowed_extensions: Vec<String>) -> TestApp {
        test_app_with_body_cap(max_file_size, allowed_extensions, 64 * 1024 * 1024)
    }

    fn test_app_with_body_cap(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        max_request_body_size: usize,
    ) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");
        let repo = Arc::new(InMemoryFileRepository::new());
        let config = UploadConfig {
            upload_dir: upload_dir.clone(),
            max_file_size,
            allowed_extensions,
            max_request_body_size,
        };
        let server = TestServer::new(api_router(repo.clone(), &config)).unwrap();
        TestApp {
            server,
            repo,
            upload_dir,
            _dir: dir,
        }
    }

    fn file_form(name: &str, content: &[u8]) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(content.to_vec())
                .file_name(name)
                .mime_type("application/octet-stream"),
        )
    }

    fn files_on_disk(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    async fn upload(app: &TestApp, name: &str, content: &[u8]) -> axum_test::TestResponse {
        app.server
            .post("/api/v1/files/upload")
            .multipart(file_form(name, content))
            .await
    }

    #[tokio::test]
    async fn test_upload_duplicate_delete_scenario() {
        let app = test_app(0, vec![]);

        let response = upload(&app, "a.txt", CONTENT_37).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["file"]["size"], 37);
        assert_eq!(body["file"]["extension"], ".txt");
        assert_eq!(body["file"]["name"], "a.txt");
        assert_eq!(body["file"]["mime_type"], "text/plain");
        let first_id = body["file"]["id"].as_i64().unwrap();

        let response = upload(&app, "b.txt", CONTENT_37).await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "File already exists");
        assert_eq!(body["file_id"], first_id);
        assert_eq!(files_on_disk(&app.upload_dir), 1);

        let response = app.server.delete(&format!("/api/v1/files/{first_id}")).await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({
            "success": true,
            "message": "File deleted successfully"
        }));
        assert_eq!(files_on_disk(&app.upload_dir), 0);

        app.server
            .get(&format!("/api/v1/files/{first_id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .delete(&format!("/api/v1/files/{first_id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_over_size_limit_leaves_nothing_behind() {
        let app = test_app(10, vec![]);

        let response = upload(&app, "big.txt", b"01234567890").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "File size exceeds maximum allowed size: 10 bytes"
        );
        assert!(app.repo.all_rows().is_empty());
        assert_eq!(files_on_disk(&app.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_unlimited_file_size_still_honors_body_cap() {
        let app = test_app_with_body_cap(0, vec![], 512);

        let response = upload(&app, "big.bin", &[0u8; 4096]).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(app.repo.all_rows().is_empty());
        assert_eq!(files_on_disk(&app.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_upload_write_failure_is_internal_error() {
        let app = test_app(0, vec![]);
        std::fs::write(&app.upload_dir, b"not a directory").unwrap();

        let response = upload(&app, "a.txt", b"data").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Failed to save uploaded file");
        assert!(app.repo.all_rows().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_extension() {
        let app = test_app(0, vec![".pdf".into()]);

        let response = upload(&app, "a.txt", b"hello").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "File extension not allowed: .txt");
        assert!(app.repo.all_rows().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_file_part() {
        let app = test_app(0, vec![]);

        let form = MultipartForm::new().add_text("comment", "no file here");
        let response = app
            .server
            .post("/api/v1/files/upload")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_upload_with_non_multipart_body() {
        let app = test_app(0, vec![]);

        let response = app
            .server
            .post("/api/v1/files/upload")
            .json(&serde_json::json!({"file": "nope"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_strips_client_directories() {
        let app = test_app(0, vec![]);

        let response = upload(&app, "../../etc/evil.txt", b"payload").await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["file"]["name"], "evil.txt");
        let row = &app.repo.all_rows()[0];
        assert!(Path::new(&row.storage_path).starts_with(&app.upload_dir));
    }

    #[tokio::test]
    async fn test_upload_persistence_failure_rolls_back() {
        let app = test_app(0, vec![]);
        app.repo.fail_writes(true);

        let response = upload(&app, "a.txt", b"data").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Failed to save file metadata");
        assert_eq!(files_on_disk(&app.upload_dir), 0);
    }

    #[tokio::test]
    async fn test_list_files_pagination() {
        let app = test_app(0, vec![]);
        for i in 0..3 {
            upload(&app, &format!("f{i}.txt"), format!("content {i}").as_bytes())
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = app.server.get("/api/v1/files").await.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["limit"], 10);
        assert_eq!(body["data"]["offset"], 0);
        let files = body["data"]["files"].as_array().unwrap();
        assert_eq!(files.len(), 3);
        // Newest first
        assert_eq!(files[0]["name"], "f2.txt");
        let id = files[0]["id"].as_i64().unwrap();
        assert_eq!(
            files[0]["download_url"],
            format!("/api/v1/files/{id}/download")
        );

        let body: Value = app
            .server
            .get("/api/v1/files")
            .add_query_param("limit", 2)
            .add_query_param("offset", 2)
            .await
            .json();
        assert_eq!(body["data"]["limit"], 2);
        assert_eq!(body["data"]["offset"], 2);
        assert_eq!(body["data"]["files"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["total"], 3);
    }

    #[tokio::test]
    async fn test_list_files_invalid_pagination_falls_back() {
        let app = test_app(0, vec![]);

        for (limit, offset) in [("0", "-1"), ("101", "abc"), ("abc", "-10"), ("-3", "")] {
            let response = app
                .server
                .get("/api/v1/files")
                .add_query_param("limit", limit)
                .add_query_param("offset", offset)
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"]["limit"], 10, "limit={limit}");
            assert_eq!(body["data"]["offset"], 0, "offset={offset}");
        }
    }

    #[tokio::test]
    async fn test_get_file_details_and_invalid_id() {
        let app = test_app(0, vec![]);
        let body: Value = upload(&app, "doc.pdf", b"%PDF-1.4").await.json();
        let id = body["file"]["id"].as_i64().unwrap();

        let response = app.server.get(&format!("/api/v1/files/{id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["mime_type"], "application/pdf");
        assert_eq!(body["data"]["size"], 8);

        let response = app.server.get("/api/v1/files/not-a-number").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid file ID");

        app.server
            .get("/api/v1/files/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_streams_bytes_with_headers() {
        let app = test_app(0, vec![]);
        let body: Value = upload(&app, "a.txt", CONTENT_37).await.json();
        let id = body["file"]["id"].as_i64().unwrap();

        let response = app
            .server
            .get(&format!("/api/v1/files/{id}/download"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment; filename=\"a.txt\""
        );
        assert_eq!(response.as_bytes().as_ref(), CONTENT_37);
    }

    #[tokio::test]
    async fn test_download_missing_bytes_is_distinct_not_found() {
        let app = test_app(0, vec![]);
        let body: Value = upload(&app, "a.txt", b"vanishing").await.json();
        let id = body["file"]["id"].as_i64().unwrap();
        std::fs::remove_file(&app.repo.all_rows()[0].storage_path).unwrap();

        let response = app
            .server
            .get(&format!("/api/v1/files/{id}/download"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "File not found on disk");

        let response = app.server.get("/api/v1/files/4242/download").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "File not found");
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = test_app(0, vec![]);

        let body: Value = app.server.get("/api/v1/stats").await.json();
        assert_eq!(body["data"]["total_files"], 0);
        assert_eq!(body["data"]["total_size"], 0);
        assert!(body["data"]["largest_file"].is_null());

        upload(&app, "a.txt", b"1234").await;
        upload(&app, "b.txt", b"123456").await;
        upload(&app, "c.png", b"12").await;

        let body: Value = app.server.get("/api/v1/stats").await.json();
        assert_eq!(body["data"]["total_files"], 3);
        assert_eq!(body["data"]["total_size"], 12);
        assert_eq!(body["data"]["recent_uploads"], 3);
        assert_eq!(body["data"]["largest_file"]["name"], "b.txt");
        assert_eq!(body["data"]["largest_file"]["size"], 6);
        assert_eq!(body["data"]["extension_stats"][0]["extension"], ".txt");
        assert_eq!(body["data"]["extension_stats"][0]["count"], 2);
        assert_eq!(body["data"]["extension_stats"][0]["size"], 10);
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = test_app(0, vec![]);

        let response = app.server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");

        app.repo.set_unavailable(true);
        let response = app.server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");

        let body: Value = app.server.get("/").await.json();
        assert_eq!(body["message"], "File Upload API");
        assert_eq!(body["docs"], "/api/v1");
        assert_eq!(body["health"], "/health");
    }
}
