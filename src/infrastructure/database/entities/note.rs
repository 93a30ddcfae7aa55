// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub note_id: String,
    pub note_url: Option<String>,
    pub note_type: Option<String>,
    pub author_user_id: Option<String>,
    pub author_nickname: Option<String>,
    pub author_avatar: Option<String>,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub tags: Option<Json>,
    pub upload_time: Option<ChronoDateTimeWithTimeZone>,
    pub ip_location: Option<String>,
    pub liked_count: i32,
    pub collected_count: i32,
    pub comment_count: i32,
    pub share_count: i32,
    pub video_cover: Option<String>,
    pub video_addr: Option<String>,
    pub image_list: Option<Json>,
    pub current_tags: Json,
    pub is_new: bool,
    pub is_changed: bool,
    pub is_important: bool,
    pub is_deleted: bool,
    pub change_reason: Option<String>,
    pub matched_keywords: Json,
    pub important_comment_ids: Json,
    pub previous_stats: Option<Json>,
    pub first_crawl_time: ChronoDateTimeWithTimeZone,
    pub last_crawl_time: ChronoDateTimeWithTimeZone,
    pub crawl_count: i32,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::tag_change_log::Entity")]
    TagChangeLog,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag_change_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagChangeLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
