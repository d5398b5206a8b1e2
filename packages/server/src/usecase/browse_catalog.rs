//! UseCase: ライブラリ閲覧
//!
//! オリジンのカタログをそのまま返すだけの薄いユースケース。

use std::sync::Arc;

use crate::domain::{CatalogError, CatalogItem, EpisodeItem, ItemId, MediaCatalog};

/// ライブラリ閲覧のユースケース
pub struct BrowseCatalogUseCase {
    catalog: Arc<dyn MediaCatalog>,
}

impl BrowseCatalogUseCase {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { catalog }
    }

    /// 最近追加された映画・シリーズの一覧
    pub async fn list_library(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.catalog.list_library().await.inspect_err(|e| {
            tracing::error!("Failed to list library: {}", e);
        })
    }

    /// シリーズのエピソード一覧
    pub async fn list_episodes(
        &self,
        series_id: &ItemId,
    ) -> Result<Vec<EpisodeItem>, CatalogError> {
        self.catalog
            .list_episodes(series_id)
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to list episodes of '{}': {}", series_id, e);
            })
    }
}
