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

use crate::domain::models::comment::Comment;
use crate::domain::repositories::comment_repository::CommentRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::comment as comment_entity;
use crate::infrastructure::repositories::note_repo_impl::{from_json, to_json};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct CommentRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CommentRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<comment_entity::Model> for Comment {
    fn from(model: comment_entity::Model) -> Self {
        Self {
            id: model.id,
            comment_id: model.comment_id,
            note_id: model.note_id,
            commenter_user_id: model.commenter_user_id,
            commenter_nickname: model.commenter_nickname,
            content: model.content,
            like_count: model.like_count,
            upload_time: model.upload_time,
            ip_location: model.ip_location,
            parent_comment_id: model.parent_comment_id,
            root_comment_id: model.root_comment_id,
            contains_business_keywords: model.contains_business_keywords,
            business_keywords_found: from_json(Some(model.business_keywords_found)),
            importance_score: model.importance_score,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Comment> for comment_entity::ActiveModel {
    fn from(comment: &Comment) -> Self {
        Self {
            id: Set(comment.id),
            comment_id: Set(comment.comment_id.clone()),
            note_id: Set(comment.note_id.clone()),
            commenter_user_id: Set(comment.commenter_user_id.clone()),
            commenter_nickname: Set(comment.commenter_nickname.clone()),
            content: Set(comment.content.clone()),
            like_count: Set(comment.like_count),
            upload_time: Set(comment.upload_time),
            ip_location: Set(comment.ip_location.clone()),
            parent_comment_id: Set(comment.parent_comment_id.clone()),
            root_comment_id: Set(comment.root_comment_id.clone()),
            contains_business_keywords: Set(comment.contains_business_keywords),
            business_keywords_found: Set(to_json(&comment.business_keywords_found)),
            importance_score: Set(comment.importance_score),
            created_at: Set(comment.created_at),
            updated_at: Set(comment.updated_at),
        }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn find_by_note_id(
        &self,
        note_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Comment>, u64), RepositoryError> {
        let base = comment_entity::Entity::find()
            .filter(comment_entity::Column::NoteId.eq(note_id));

        let total = base.clone().count(self.db.as_ref()).await?;
        let models = base
            .order_by_desc(comment_entity::Column::LikeCount)
            .order_by_asc(comment_entity::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Comment::from).collect(), total))
    }
}
