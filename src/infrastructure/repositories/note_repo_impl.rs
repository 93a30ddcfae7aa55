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

use crate::domain::models::note::{lenient::parse_time_text, EngagementStats, Note, NoteTag};
use crate::domain::models::tag_change_log::TagChangeLog;
use crate::domain::repositories::note_repository::{
    FilterOperator, NoteField, NoteFilter, NoteQuery, NoteRepository, NoteStats,
};
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{note as note_entity, tag_change_log as log_entity};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// 笔记仓库实现
///
/// 基于SeaORM实现的笔记查询层
#[derive(Clone)]
pub struct NoteRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl NoteRepositoryImpl {
    /// 创建新的笔记仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// 将 JSON 列解析为目标类型，脏数据按默认值处理
pub(crate) fn from_json<T: DeserializeOwned + Default>(value: Option<Value>) -> T {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn tags_from_json(value: Value) -> Vec<NoteTag> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|s| s.parse().ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn tags_to_json(tags: &[NoteTag]) -> Value {
    Value::Array(tags.iter().map(|t| Value::String(t.to_string())).collect())
}

impl From<note_entity::Model> for Note {
    fn from(model: note_entity::Model) -> Self {
        Self {
            id: model.id,
            note_id: model.note_id,
            note_url: model.note_url,
            note_type: model.note_type,
            author_user_id: model.author_user_id,
            author_nickname: model.author_nickname,
            author_avatar: model.author_avatar,
            title: model.title,
            description: model.description,
            tags: from_json(model.tags),
            upload_time: model.upload_time,
            ip_location: model.ip_location,
            liked_count: model.liked_count,
            collected_count: model.collected_count,
            comment_count: model.comment_count,
            share_count: model.share_count,
            video_cover: model.video_cover,
            video_addr: model.video_addr,
            image_list: from_json(model.image_list),
            is_new: model.is_new,
            is_changed: model.is_changed,
            is_important: model.is_important,
            is_deleted: model.is_deleted,
            current_tags: tags_from_json(model.current_tags),
            change_reason: model.change_reason,
            matched_keywords: from_json(Some(model.matched_keywords)),
            important_comment_ids: from_json(Some(model.important_comment_ids)),
            previous_stats: model
                .previous_stats
                .and_then(|v| serde_json::from_value::<EngagementStats>(v).ok()),
            first_crawl_time: model.first_crawl_time,
            last_crawl_time: model.last_crawl_time,
            crawl_count: model.crawl_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Note> for note_entity::ActiveModel {
    fn from(note: &Note) -> Self {
        Self {
            id: Set(note.id),
            note_id: Set(note.note_id.clone()),
            note_url: Set(note.note_url.clone()),
            note_type: Set(note.note_type.clone()),
            author_user_id: Set(note.author_user_id.clone()),
            author_nickname: Set(note.author_nickname.clone()),
            author_avatar: Set(note.author_avatar.clone()),
            title: Set(note.title.clone()),
            description: Set(note.description.clone()),
            tags: Set(Some(to_json(&note.tags))),
            upload_time: Set(note.upload_time),
            ip_location: Set(note.ip_location.clone()),
            liked_count: Set(note.liked_count),
            collected_count: Set(note.collected_count),
            comment_count: Set(note.comment_count),
            share_count: Set(note.share_count),
            video_cover: Set(note.video_cover.clone()),
            video_addr: Set(note.video_addr.clone()),
            image_list: Set(Some(to_json(&note.image_list))),
            current_tags: Set(tags_to_json(&note.current_tags)),
            is_new: Set(note.is_new),
            is_changed: Set(note.is_changed),
            is_important: Set(note.is_important),
            is_deleted: Set(note.is_deleted),
            change_reason: Set(note.change_reason.clone()),
            matched_keywords: Set(to_json(&note.matched_keywords)),
            important_comment_ids: Set(to_json(&note.important_comment_ids)),
            previous_stats: Set(note.previous_stats.as_ref().map(to_json)),
            first_crawl_time: Set(note.first_crawl_time),
            last_crawl_time: Set(note.last_crawl_time),
            crawl_count: Set(note.crawl_count),
            created_at: Set(note.created_at),
            updated_at: Set(note.updated_at),
        }
    }
}

impl From<log_entity::Model> for TagChangeLog {
    fn from(model: log_entity::Model) -> Self {
        Self {
            id: model.id,
            note_id: model.note_id,
            old_tags: tags_from_json(model.old_tags),
            new_tags: tags_from_json(model.new_tags),
            change_type: model.change_type,
            change_reason: model.change_reason,
            old_stats: model.old_stats.and_then(|v| serde_json::from_value(v).ok()),
            new_stats: model.new_stats.and_then(|v| serde_json::from_value(v).ok()),
            related_comment_ids: from_json(Some(model.related_comment_ids)),
            created_at: model.created_at,
        }
    }
}

impl From<&TagChangeLog> for log_entity::ActiveModel {
    fn from(log: &TagChangeLog) -> Self {
        Self {
            id: Set(log.id),
            note_id: Set(log.note_id.clone()),
            old_tags: Set(tags_to_json(&log.old_tags)),
            new_tags: Set(tags_to_json(&log.new_tags)),
            change_type: Set(log.change_type.clone()),
            change_reason: Set(log.change_reason.clone()),
            old_stats: Set(log.old_stats.as_ref().map(to_json)),
            new_stats: Set(log.new_stats.as_ref().map(to_json)),
            related_comment_ids: Set(to_json(&log.related_comment_ids)),
            created_at: Set(log.created_at),
        }
    }
}

/// 字段的值类型，决定筛选值的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Int,
    Bool,
    Time,
}

fn column_of(field: NoteField) -> (note_entity::Column, FieldKind) {
    use note_entity::Column as C;
    match field {
        NoteField::NoteId => (C::NoteId, FieldKind::Text),
        NoteField::NoteType => (C::NoteType, FieldKind::Text),
        NoteField::Title => (C::Title, FieldKind::Text),
        NoteField::Description => (C::Description, FieldKind::Text),
        NoteField::AuthorUserId => (C::AuthorUserId, FieldKind::Text),
        NoteField::AuthorNickname => (C::AuthorNickname, FieldKind::Text),
        NoteField::IpLocation => (C::IpLocation, FieldKind::Text),
        NoteField::LikedCount => (C::LikedCount, FieldKind::Int),
        NoteField::CollectedCount => (C::CollectedCount, FieldKind::Int),
        NoteField::CommentCount => (C::CommentCount, FieldKind::Int),
        NoteField::ShareCount => (C::ShareCount, FieldKind::Int),
        NoteField::CrawlCount => (C::CrawlCount, FieldKind::Int),
        NoteField::IsNew => (C::IsNew, FieldKind::Bool),
        NoteField::IsChanged => (C::IsChanged, FieldKind::Bool),
        NoteField::IsImportant => (C::IsImportant, FieldKind::Bool),
        NoteField::UploadTime => (C::UploadTime, FieldKind::Time),
        NoteField::FirstCrawlTime => (C::FirstCrawlTime, FieldKind::Time),
        NoteField::LastCrawlTime => (C::LastCrawlTime, FieldKind::Time),
        NoteField::CreatedAt => (C::CreatedAt, FieldKind::Time),
        NoteField::UpdatedAt => (C::UpdatedAt, FieldKind::Time),
    }
}

/// 按字段类型把 JSON 值转换为 SQL 值，无法转换时返回 None
fn sql_value(kind: FieldKind, value: &Value) -> Option<sea_orm::Value> {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) => Some(s.clone().into()),
            Value::Number(n) => Some(n.to_string().into()),
            Value::Bool(b) => Some(b.to_string().into()),
            _ => None,
        },
        FieldKind::Int => match value {
            Value::Number(n) => n.as_i64().map(Into::into),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Into::into),
            _ => None,
        },
        FieldKind::Bool => match value {
            Value::Bool(b) => Some((*b).into()),
            Value::String(s) => s.parse::<bool>().ok().map(Into::into),
            _ => None,
        },
        FieldKind::Time => match value {
            Value::String(s) => parse_time_text(s.trim()).map(Into::into),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|t| t.fixed_offset().into()),
            _ => None,
        },
    }
}

fn array_values(kind: FieldKind, value: &Value) -> Option<Vec<sea_orm::Value>> {
    match value {
        Value::Array(items) => {
            let values: Vec<_> = items.iter().filter_map(|v| sql_value(kind, v)).collect();
            (!values.is_empty()).then_some(values)
        }
        other => sql_value(kind, other).map(|v| vec![v]),
    }
}

fn lower_like(column: note_entity::Column, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}

/// 将一个高级筛选条件转换为 SQL 条件
///
/// 值与字段类型不匹配或操作符不适用时返回 None，调用方忽略该条件
pub(crate) fn filter_condition(filter: &NoteFilter) -> Option<Condition> {
    let (column, kind) = column_of(filter.field);
    let expr: SimpleExpr = match filter.operator {
        FilterOperator::Eq => column.eq(sql_value(kind, &filter.value)?),
        FilterOperator::Ne => column.ne(sql_value(kind, &filter.value)?),
        FilterOperator::Gt => column.gt(sql_value(kind, &filter.value)?),
        FilterOperator::Gte => column.gte(sql_value(kind, &filter.value)?),
        FilterOperator::Lt => column.lt(sql_value(kind, &filter.value)?),
        FilterOperator::Lte => column.lte(sql_value(kind, &filter.value)?),
        FilterOperator::ILike | FilterOperator::NotILike => {
            if kind != FieldKind::Text {
                return None;
            }
            let needle = filter.value.as_str()?;
            let like = lower_like(column, needle);
            if filter.operator == FilterOperator::ILike {
                like
            } else {
                return Some(Condition::any().add(like).not());
            }
        }
        FilterOperator::IsEmpty => {
            let mut cond = Condition::any().add(column.is_null());
            if kind == FieldKind::Text {
                cond = cond.add(column.eq(""));
            }
            return Some(cond);
        }
        FilterOperator::IsNotEmpty => {
            let mut cond = Condition::all().add(column.is_not_null());
            if kind == FieldKind::Text {
                cond = cond.add(column.ne(""));
            }
            return Some(cond);
        }
        FilterOperator::InArray => column.is_in(array_values(kind, &filter.value)?),
        FilterOperator::NotInArray => column.is_not_in(array_values(kind, &filter.value)?),
    };
    Some(Condition::all().add(expr))
}

/// 组装搜索条件，软删除的笔记始终排除
fn build_search(query: &NoteQuery) -> Select<note_entity::Entity> {
    let mut select =
        note_entity::Entity::find().filter(note_entity::Column::IsDeleted.eq(false));

    if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(lower_like(note_entity::Column::Title, keyword))
                .add(lower_like(note_entity::Column::Description, keyword)),
        );
    }
    if let Some(is_new) = query.is_new {
        select = select.filter(note_entity::Column::IsNew.eq(is_new));
    }
    if let Some(is_changed) = query.is_changed {
        select = select.filter(note_entity::Column::IsChanged.eq(is_changed));
    }
    if let Some(is_important) = query.is_important {
        select = select.filter(note_entity::Column::IsImportant.eq(is_important));
    }
    if let Some(author) = &query.author_user_id {
        select = select.filter(note_entity::Column::AuthorUserId.eq(author.as_str()));
    }
    if let Some(from) = query.date_from {
        select = select.filter(note_entity::Column::FirstCrawlTime.gte(from));
    }
    if let Some(to) = query.date_to {
        select = select.filter(note_entity::Column::FirstCrawlTime.lte(to));
    }
    for filter in &query.filters {
        if let Some(cond) = filter_condition(filter) {
            select = select.filter(cond);
        }
    }

    if query.sorts.is_empty() {
        select = select.order_by_desc(note_entity::Column::LastCrawlTime);
    } else {
        for sort in &query.sorts {
            let (column, _) = column_of(sort.field);
            let order = if sort.desc { Order::Desc } else { Order::Asc };
            select = select.order_by(column, order);
        }
    }

    if query.limit > 0 {
        select = select.limit(query.limit);
    }
    select.offset(query.offset)
}

#[async_trait]
impl NoteRepository for NoteRepositoryImpl {
    async fn find_by_note_id(&self, note_id: &str) -> Result<Option<Note>, RepositoryError> {
        let model = note_entity::Entity::find()
            .filter(note_entity::Column::NoteId.eq(note_id))
            .filter(note_entity::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn search(&self, query: &NoteQuery) -> Result<Vec<Note>, RepositoryError> {
        let models = build_search(query).all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Note::from).collect())
    }

    async fn stats(
        &self,
        today_start: DateTime<FixedOffset>,
    ) -> Result<NoteStats, RepositoryError> {
        let db = self.db.as_ref();
        let live = || note_entity::Entity::find().filter(note_entity::Column::IsDeleted.eq(false));

        Ok(NoteStats {
            total_notes: live().count(db).await?,
            new_notes: live()
                .filter(note_entity::Column::IsNew.eq(true))
                .count(db)
                .await?,
            changed_notes: live()
                .filter(note_entity::Column::IsChanged.eq(true))
                .count(db)
                .await?,
            important_notes: live()
                .filter(note_entity::Column::IsImportant.eq(true))
                .count(db)
                .await?,
            today_crawled: live()
                .filter(note_entity::Column::FirstCrawlTime.gte(today_start))
                .count(db)
                .await?,
        })
    }

    async fn soft_delete(&self, note_id: &str) -> Result<(), RepositoryError> {
        let model = note_entity::Entity::find()
            .filter(note_entity::Column::NoteId.eq(note_id))
            .filter(note_entity::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: note_entity::ActiveModel = model.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now().into());
        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_tag_logs(&self, note_id: &str) -> Result<Vec<TagChangeLog>, RepositoryError> {
        let models = log_entity::Entity::find()
            .filter(log_entity::Column::NoteId.eq(note_id))
            .order_by_desc(log_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(TagChangeLog::from).collect())
    }
}

#[cfg(test)]
#[path = "note_repo_impl_test.rs"]
mod tests;
