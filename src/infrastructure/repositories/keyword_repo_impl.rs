// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::keyword::Keyword;
use crate::domain::repositories::keyword_repository::{
    KeywordQuery, KeywordRepository, KeywordStats,
};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::keyword as keyword_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// 业务关键词仓库实现
#[derive(Clone)]
pub struct KeywordRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<keyword_entity::Model> for Keyword {
    fn from(model: keyword_entity::Model) -> Self {
        Self {
            id: model.id,
            keyword: model.keyword,
            category: model.category,
            weight: model.weight,
            is_active: model.is_active,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Keyword> for keyword_entity::ActiveModel {
    fn from(keyword: &Keyword) -> Self {
        Self {
            id: Set(keyword.id),
            keyword: Set(keyword.keyword.clone()),
            category: Set(keyword.category.clone()),
            weight: Set(keyword.weight),
            is_active: Set(keyword.is_active),
            description: Set(keyword.description.clone()),
            created_at: Set(keyword.created_at),
            updated_at: Set(keyword.updated_at),
        }
    }
}

/// 加载所有启用的关键词
///
/// 接受任意连接，入库事务内也使用同一查询
pub(crate) async fn load_active<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<Keyword>, RepositoryError> {
    let models = keyword_entity::Entity::find()
        .filter(keyword_entity::Column::IsActive.eq(true))
        .order_by_desc(keyword_entity::Column::Weight)
        .order_by_asc(keyword_entity::Column::Keyword)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Keyword::from).collect())
}

impl KeywordRepositoryImpl {
    /// 检查同名关键词，`exclude` 为更新时的自身ID
    async fn ensure_unique(
        &self,
        text: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), RepositoryError> {
        let mut select =
            keyword_entity::Entity::find().filter(keyword_entity::Column::Keyword.eq(text));
        if let Some(id) = exclude {
            select = select.filter(keyword_entity::Column::Id.ne(id));
        }
        if select.count(self.db.as_ref()).await? > 0 {
            return Err(RepositoryError::AlreadyExists(format!("Keyword '{}'", text)));
        }
        Ok(())
    }
}

#[async_trait]
impl KeywordRepository for KeywordRepositoryImpl {
    async fn create(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError> {
        self.ensure_unique(&keyword.keyword, None).await?;

        let model = keyword_entity::ActiveModel::from(keyword)
            .insert(self.db.as_ref())
            .await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Keyword>, RepositoryError> {
        let model = keyword_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_text(&self, text: &str) -> Result<Option<Keyword>, RepositoryError> {
        let model = keyword_entity::Entity::find()
            .filter(keyword_entity::Column::Keyword.eq(text))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, keyword: &Keyword) -> Result<Keyword, RepositoryError> {
        keyword_entity::Entity::find_by_id(keyword.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        self.ensure_unique(&keyword.keyword, Some(keyword.id)).await?;

        let model = keyword_entity::ActiveModel::from(keyword)
            .update(self.db.as_ref())
            .await?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = keyword_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, query: &KeywordQuery) -> Result<(Vec<Keyword>, u64), RepositoryError> {
        let mut select = keyword_entity::Entity::find();

        if query.active_only {
            select = select.filter(keyword_entity::Column::IsActive.eq(true));
        }
        if let Some(category) = &query.category {
            select = select.filter(keyword_entity::Column::Category.eq(category.as_str()));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(keyword_entity::Column::Keyword)))
                    .like(format!("%{}%", search.to_lowercase())),
            );
        }

        let total = select.clone().count(self.db.as_ref()).await?;
        let models = select
            .order_by_desc(keyword_entity::Column::Weight)
            .order_by_asc(keyword_entity::Column::Category)
            .order_by_asc(keyword_entity::Column::Keyword)
            .offset(query.skip)
            .limit(query.limit)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Keyword::from).collect(), total))
    }

    async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories: Vec<Option<String>> = keyword_entity::Entity::find()
            .select_only()
            .column(keyword_entity::Column::Category)
            .filter(keyword_entity::Column::Category.is_not_null())
            .filter(keyword_entity::Column::Category.ne(""))
            .distinct()
            .order_by_asc(keyword_entity::Column::Category)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(categories.into_iter().flatten().collect())
    }

    async fn find_active(&self) -> Result<Vec<Keyword>, RepositoryError> {
        load_active(self.db.as_ref()).await
    }

    async fn stats(&self) -> Result<KeywordStats, RepositoryError> {
        let all = keyword_entity::Entity::find().all(self.db.as_ref()).await?;

        let mut stats = KeywordStats {
            total: all.len() as u64,
            ..Default::default()
        };
        for keyword in &all {
            if keyword.is_active {
                stats.active += 1;
            }
            if let Some(category) = keyword.category.as_ref().filter(|c| !c.is_empty()) {
                *stats.category_stats.entry(category.clone()).or_insert(0) += 1;
            }
            *stats.weight_stats.entry(keyword.weight).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
