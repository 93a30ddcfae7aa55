// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::keyword_dto::{
        KeywordCreateDto, KeywordListParams, KeywordListResponse, KeywordStatsResponse,
        KeywordUpdateDto,
    },
    domain::{
        models::keyword::Keyword,
        repositories::{
            keyword_repository::{KeywordQuery, KeywordRepository},
            RepositoryError,
        },
    },
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum KeywordUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Keyword '{0}' already exists")]
    Duplicate(String),
    #[error("Keyword not found")]
    NotFound,
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for KeywordUseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => KeywordUseCaseError::NotFound,
            other => KeywordUseCaseError::Repository(other),
        }
    }
}

/// 业务关键词管理
pub struct KeywordUseCase<KR> {
    repo: Arc<KR>,
}

impl<KR> KeywordUseCase<KR>
where
    KR: KeywordRepository + 'static,
{
    pub fn new(repo: Arc<KR>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        params: KeywordListParams,
    ) -> Result<KeywordListResponse, KeywordUseCaseError> {
        params
            .validate()
            .map_err(|e| KeywordUseCaseError::ValidationError(e.to_string()))?;

        let defaults = KeywordQuery::default();
        let query = KeywordQuery {
            skip: params.skip.unwrap_or(defaults.skip),
            limit: params.limit.unwrap_or(defaults.limit),
            category: params.category.filter(|c| !c.is_empty()),
            active_only: params.active_only.unwrap_or(defaults.active_only),
            search: params.search,
        };

        let (keywords, total) = self.repo.list(&query).await?;
        let categories = self.repo.categories().await?;

        Ok(KeywordListResponse {
            keywords,
            total,
            categories,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Keyword, KeywordUseCaseError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(KeywordUseCaseError::NotFound)
    }

    pub async fn create(&self, dto: KeywordCreateDto) -> Result<Keyword, KeywordUseCaseError> {
        dto.validate()
            .map_err(|e| KeywordUseCaseError::ValidationError(e.to_string()))?;

        let text = dto.keyword.trim().to_string();
        if text.is_empty() {
            return Err(KeywordUseCaseError::ValidationError(
                "keyword cannot be empty".to_string(),
            ));
        }

        let mut keyword = Keyword::new(text.clone(), dto.category, dto.weight, dto.description);
        keyword.is_active = dto.is_active;

        let created = self.repo.create(&keyword).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => KeywordUseCaseError::Duplicate(text),
            other => other.into(),
        })?;
        info!("Created keyword {} ({})", created.keyword, created.id);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: KeywordUpdateDto,
    ) -> Result<Keyword, KeywordUseCaseError> {
        dto.validate()
            .map_err(|e| KeywordUseCaseError::ValidationError(e.to_string()))?;

        let mut keyword = self.get(id).await?;

        if let Some(text) = dto.keyword {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(KeywordUseCaseError::ValidationError(
                    "keyword cannot be empty".to_string(),
                ));
            }
            keyword.keyword = text;
        }
        if let Some(category) = dto.category {
            keyword.category = Some(category);
        }
        if let Some(weight) = dto.weight {
            keyword.weight = weight;
        }
        if let Some(is_active) = dto.is_active {
            keyword.is_active = is_active;
        }
        if let Some(description) = dto.description {
            keyword.description = Some(description);
        }
        keyword.updated_at = Utc::now().into();

        let text = keyword.keyword.clone();
        self.repo.update(&keyword).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => KeywordUseCaseError::Duplicate(text),
            other => other.into(),
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), KeywordUseCaseError> {
        self.repo.delete(id).await?;
        info!("Deleted keyword {}", id);
        Ok(())
    }

    /// 切换启用状态，返回切换后的关键词
    pub async fn toggle(&self, id: Uuid) -> Result<Keyword, KeywordUseCaseError> {
        let mut keyword = self.get(id).await?;
        keyword.is_active = !keyword.is_active;
        keyword.updated_at = Utc::now().into();
        Ok(self.repo.update(&keyword).await?)
    }

    pub async fn categories(&self) -> Result<Vec<String>, KeywordUseCaseError> {
        Ok(self.repo.categories().await?)
    }

    pub async fn stats(&self) -> Result<KeywordStatsResponse, KeywordUseCaseError> {
        let stats = self.repo.stats().await?;
        Ok(KeywordStatsResponse {
            total: stats.total,
            active: stats.active,
            inactive: stats.total.saturating_sub(stats.active),
            category_stats: stats.category_stats,
            weight_stats: stats.weight_stats,
        })
    }
}

#[cfg(test)]
#[path = "keyword_use_case_test.rs"]
mod tests;
