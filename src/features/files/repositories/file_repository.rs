use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{ExtensionStat, FileRecord, FileStats, NewFileRecord};
use crate::shared::constants::RECENT_UPLOAD_WINDOW_HOURS;

/// Persistence contract for file metadata.
///
/// Every read excludes soft-deleted records.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Live record holding the given content digest, if any
    async fn find_by_digest(&self, digest: &str) -> Result<Option<FileRecord>>;

    /// Insert a record. A live record with the same digest yields `AppError::Conflict`.
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>>;

    /// Page of live records, newest first, plus the total live count
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<FileRecord>, i64)>;

    /// Mark a live record deleted. Returns false when no live record matched.
    async fn soft_delete(&self, id: i64) -> Result<bool>;

    async fn aggregate_stats(&self) -> Result<FileStats>;

    /// Trivial round trip used by the health check
    async fn ping(&self) -> Result<()>;
}

const FILE_COLUMNS: &str = "id, stored_name, original_name, storage_path, size_bytes, mime_type, \
     extension, content_hash, uploaded_at, updated_at, deleted_at";

/// PostgreSQL implementation backed by the `files` table
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_digest(&self, digest: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE content_hash = $1 AND deleted_at IS NULL"
        ))
        .bind(digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn create(&self, record: NewFileRecord) -> Result<FileRecord> {
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            INSERT INTO files (stored_name, original_name, storage_path, size_bytes, mime_type, extension, content_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(&record.stored_name)
        .bind(&record.original_name)
        .bind(&record.storage_path)
        .bind(record.size_bytes)
        .bind(&record.mime_type)
        .bind(&record.extension)
        .bind(&record.content_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(file) => Ok(file),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                debug!(
                    "Unique violation inserting file with hash {}: {}",
                    record.content_hash, db_err
                );
                Err(AppError::Conflict("File already exists".to_string()))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<FileRecord>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        let files = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            SELECT {FILE_COLUMNS} FROM files
            WHERE deleted_at IS NULL
            ORDER BY uploaded_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((files, total))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE files
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn aggregate_stats(&self) -> Result<FileStats> {
        let (total_files, total_size): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(size_bytes), 0)::BIGINT
            FROM files
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let extension_stats = sqlx::query_as::<_, ExtensionStat>(
            r#"
            SELECT extension, COUNT(*) AS count, COALESCE(SUM(size_bytes), 0)::BIGINT AS size
            FROM files
            WHERE deleted_at IS NULL
            GROUP BY extension
            ORDER BY count DESC, extension ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let since = Utc::now() - Duration::hours(RECENT_UPLOAD_WINDOW_HOURS);
        let recent_uploads: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files WHERE deleted_at IS NULL AND uploaded_at > $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let largest_file = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            SELECT {FILE_COLUMNS} FROM files
            WHERE deleted_at IS NULL
            ORDER BY size_bytes DESC, id ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(FileStats {
            total_files,
            total_size,
            recent_uploads,
            largest_file,
            extension_stats,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
