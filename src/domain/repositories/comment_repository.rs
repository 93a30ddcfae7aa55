// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::comment::Comment;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 评论仓库特质
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// 分页获取笔记下的评论，按点赞数倒序
    ///
    /// 返回当前页和总数
    async fn find_by_note_id(
        &self,
        note_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Comment>, u64), RepositoryError>;
}
