use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{
    extension_of, resolve_mime_type, ContentDigest, LocalStorage, RemoveOutcome, Sha256Digest,
};
use crate::shared::validation::UploadPolicy;

const DUPLICATE_MESSAGE: &str = "File already exists";

/// Service for file operations: the upload workflow plus read and delete paths
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    storage: LocalStorage,
    policy: UploadPolicy,
    digest: Arc<dyn ContentDigest>,
}

impl FileService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        storage: LocalStorage,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            repository,
            storage,
            policy,
            digest: Arc::new(Sha256Digest),
        }
    }

    /// Replace the content digest used for deduplication
    pub fn with_digest(mut self, digest: Arc<dyn ContentDigest>) -> Self {
        self.digest = digest;
        self
    }

    /// Validate, store, hash, deduplicate and persist an upload.
    ///
    /// Once bytes are on disk, every failure removes them before returning.
    /// A live record with identical content yields `AppError::DuplicateFile`.
    pub async fn upload_file(&self, original_name: &str, data: &[u8]) -> Result<FileRecord> {
        self.policy
            .validate(data.len() as u64, original_name)
            .map_err(|violation| AppError::Validation(violation.to_string()))?;

        let stored = self.storage.write(original_name, data).await.map_err(|e| {
            error!("Failed to save uploaded file {}: {}", original_name, e);
            AppError::Internal("Failed to save uploaded file".to_string())
        })?;
        let storage_path = stored.storage_path.to_string_lossy().into_owned();

        let hash = match self.digest.digest(&stored.storage_path).await {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to calculate file hash for {}: {}", storage_path, e);
                self.discard(&stored.storage_path).await;
                return Err(AppError::Internal(
                    "Failed to calculate file hash".to_string(),
                ));
            }
        };

        match self.repository.find_by_digest(&hash).await {
            Ok(Some(existing)) => {
                debug!(
                    "Duplicate upload of {} matches file id={}",
                    original_name, existing.id
                );
                self.discard_unless_live(&stored.storage_path, &existing).await;
                return Err(AppError::DuplicateFile {
                    message: DUPLICATE_MESSAGE.to_string(),
                    file_id: existing.id,
                });
            }
            Ok(None) => {}
            Err(e) => {
                self.discard(&stored.storage_path).await;
                return Err(e);
            }
        }

        let record = NewFileRecord {
            stored_name: stored.stored_name,
            original_name: original_name.to_string(),
            storage_path,
            size_bytes: stored.bytes_written as i64,
            mime_type: resolve_mime_type(original_name),
            extension: extension_of(original_name),
            content_hash: hash.clone(),
        };

        let file = match self.repository.create(record).await {
            Ok(file) => file,
            Err(e) => {
                return Err(self
                    .resolve_create_failure(e, &hash, &stored.storage_path)
                    .await);
            }
        };

        info!(
            "File uploaded successfully: {} (ID: {}, size={})",
            file.original_name, file.id, file.size_bytes
        );

        Ok(file)
    }

    /// Roll back the written bytes after a failed insert and map the error.
    ///
    /// A conflict at insert time means a concurrent upload of the same content
    /// won the race; report it like the pre-insert duplicate check would.
    async fn resolve_create_failure(
        &self,
        err: AppError,
        hash: &str,
        storage_path: &Path,
    ) -> AppError {
        match err {
            AppError::Conflict(_) => match self.repository.find_by_digest(hash).await {
                Ok(Some(existing)) => {
                    self.discard_unless_live(storage_path, &existing).await;
                    AppError::DuplicateFile {
                        message: DUPLICATE_MESSAGE.to_string(),
                        file_id: existing.id,
                    }
                }
                _ => {
                    self.discard(storage_path).await;
                    error!("Insert conflict for hash {} but no live record found", hash);
                    AppError::Internal("Failed to save file metadata".to_string())
                }
            },
            AppError::Database(e) => {
                self.discard(storage_path).await;
                error!("Failed to save file metadata: {:?}", e);
                AppError::Internal("Failed to save file metadata".to_string())
            }
            other => {
                self.discard(storage_path).await;
                other
            }
        }
    }

    /// Discard rolled-back bytes unless they sit at the path of `live`.
    ///
    /// Same name and same second map to the same stored path, so a duplicate
    /// may have just rewritten the live record's own file with identical bytes.
    async fn discard_unless_live(&self, storage_path: &Path, live: &FileRecord) {
        if Path::new(&live.storage_path) == storage_path {
            debug!(
                "Duplicate shares stored path with file id={}, keeping {}",
                live.id,
                storage_path.display()
            );
            return;
        }
        self.discard(storage_path).await;
    }

    /// Remove bytes written by a failed upload. Errors are only logged.
    async fn discard(&self, storage_path: &Path) {
        match self.storage.remove(storage_path).await {
            Ok(RemoveOutcome::Removed) => {
                debug!("Rolled back stored file {}", storage_path.display())
            }
            Ok(RemoveOutcome::NotFound) => {}
            Err(e) => warn!(
                "Failed to clean up stored file {}: {}",
                storage_path.display(),
                e
            ),
        }
    }

    pub async fn get_file(&self, id: i64) -> Result<FileRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Page of live files, newest first, with the total live count
    pub async fn list_files(&self, limit: i64, offset: i64) -> Result<(Vec<FileRecord>, i64)> {
        self.repository.list(limit, offset).await
    }

    /// Look up a file and open its bytes for streaming
    pub async fn open_file(&self, id: i64) -> Result<(FileRecord, tokio::fs::File)> {
        let file = self.get_file(id).await?;

        if !self.storage.exists(&file.storage_path).await? {
            warn!(
                "File id={} has no bytes at {}",
                file.id, file.storage_path
            );
            return Err(AppError::NotFound("File not found on disk".to_string()));
        }

        // The bytes can vanish between the check and the open when a delete races us
        let handle = self
            .storage
            .open(&file.storage_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::NotFound("File not found on disk".to_string()),
                _ => AppError::Storage(e),
            })?;

        Ok((file, handle))
    }

    /// Best-effort removal of the bytes, then soft delete of the record
    pub async fn delete_file(&self, id: i64) -> Result<()> {
        let file = self.get_file(id).await?;

        match self.storage.remove(&file.storage_path).await {
            Ok(RemoveOutcome::Removed) => debug!("File deleted from disk: {}", file.storage_path),
            Ok(RemoveOutcome::NotFound) => {
                warn!("File already missing from disk: {}", file.storage_path)
            }
            Err(e) => warn!(
                "Failed to delete file from disk {}: {}",
                file.storage_path, e
            ),
        }

        if !self.repository.soft_delete(file.id).await? {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        info!(
            "File deleted successfully: {} (ID: {})",
            file.original_name, file.id
        );

        Ok(())
    }
}
