use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for files
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub extension: String,
    pub content_hash: String,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl FileRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fully populated record ready to be inserted
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub stored_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub extension: String,
    pub content_hash: String,
}

/// Per-extension aggregate
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExtensionStat {
    pub extension: String,
    pub count: i64,
    pub size: i64,
}

/// Aggregates over all live records
#[derive(Debug, Clone)]
pub struct FileStats {
    pub total_files: i64,
    pub total_size: i64,
    pub recent_uploads: i64,
    pub largest_file: Option<FileRecord>,
    pub extension_stats: Vec<ExtensionStat>,
}
