use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::{ExtensionStat, FileRecord, FileStats};

/// Largest live file
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LargestFileDto {
    pub id: i64,
    pub name: String,
    pub size: i64,
}

impl From<&FileRecord> for LargestFileDto {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id,
            name: file.original_name.clone(),
            size: file.size_bytes,
        }
    }
}

/// Count and total size for one extension
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtensionStatDto {
    pub extension: String,
    pub count: i64,
    pub size: i64,
}

impl From<ExtensionStat> for ExtensionStatDto {
    fn from(stat: ExtensionStat) -> Self {
        Self {
            extension: stat.extension,
            count: stat.count,
            size: stat.size,
        }
    }
}

/// Aggregate upload statistics over live files
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileStatsDto {
    pub total_files: i64,
    /// Sum of file sizes in bytes
    pub total_size: i64,
    /// Uploads in the last 24 hours
    pub recent_uploads: i64,
    /// Null when no files are stored
    pub largest_file: Option<LargestFileDto>,
    /// Ordered by count, highest first
    pub extension_stats: Vec<ExtensionStatDto>,
}

impl From<FileStats> for FileStatsDto {
    fn from(stats: FileStats) -> Self {
        Self {
            total_files: stats.total_files,
            total_size: stats.total_size,
            recent_uploads: stats.recent_uploads,
            largest_file: stats.largest_file.as_ref().map(LargestFileDto::from),
            extension_stats: stats
                .extension_stats
                .into_iter()
                .map(ExtensionStatDto::from)
                .collect(),
        }
    }
}
