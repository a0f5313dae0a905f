use std::sync::Arc;

use crate::core::error::Result;
use crate::features::files::repositories::FileRepository;
use crate::features::stats::dtos::FileStatsDto;

/// Service for aggregate upload statistics
pub struct StatsService {
    repository: Arc<dyn FileRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn FileRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_stats(&self) -> Result<FileStatsDto> {
        let stats = self.repository.aggregate_stats().await?;
        Ok(FileStatsDto::from(stats))
    }
}
