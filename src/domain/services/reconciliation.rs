// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::models::note::{Note, NoteTag, ScrapedNote};
use crate::domain::models::tag_change_log::{TagChangeLog, CHANGE_TYPE_STATS};
use crate::domain::services::importance::ImportanceEvaluator;

/// 对账结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// 首次入库
    Created,
    /// 互动数据有变化
    Changed,
    /// 重复爬取且互动数据未变化
    Unchanged,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Created => "created",
            ReconcileOutcome::Changed => "changed",
            ReconcileOutcome::Unchanged => "unchanged",
        }
    }
}

/// 一次对账的产出：合并后的笔记和可选的审计日志
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub note: Note,
    pub tag_log: Option<TagChangeLog>,
    pub outcome: ReconcileOutcome,
}

/// 将一条新爬取的笔记合并进已存储的记录
///
/// 纯函数，不访问数据库。每次调用都执行变化检测，同一天内的重复爬取也不例外。
///
/// # 参数
///
/// * `existing` - 已存储的笔记（包括已软删除的）
/// * `incoming` - 新爬取的数据
/// * `evaluator` - 重要性判定器
/// * `now` - 本次爬取时间
pub fn reconcile(
    existing: Option<Note>,
    incoming: &ScrapedNote,
    evaluator: &ImportanceEvaluator,
    now: DateTime<FixedOffset>,
) -> Reconciliation {
    let (mut note, tag_log, outcome) = match existing {
        None => (new_note(incoming, now), None, ReconcileOutcome::Created),
        Some(mut note) => {
            let old_stats = note.stats();
            let new_stats = incoming.stats();
            let changes = old_stats.diff(&new_stats);

            refresh_descriptive_fields(&mut note, incoming);
            note.is_new = false;
            note.crawl_count += 1;
            note.last_crawl_time = now;

            if changes.is_empty() {
                note.is_changed = false;
                note.change_reason = None;
                (note, None, ReconcileOutcome::Unchanged)
            } else {
                let old_tags = note.current_tags.clone();
                if !note.current_tags.contains(&NoteTag::Changed) {
                    note.current_tags.push(NoteTag::Changed);
                }
                let reason = changes.join("; ");

                note.is_changed = true;
                note.previous_stats = Some(old_stats);
                note.liked_count = new_stats.liked_count;
                note.collected_count = new_stats.collected_count;
                note.comment_count = new_stats.comment_count;
                note.share_count = new_stats.share_count;
                note.change_reason = Some(reason.clone());

                let log = TagChangeLog {
                    id: Uuid::new_v4(),
                    note_id: note.note_id.clone(),
                    old_tags,
                    new_tags: note.current_tags.clone(),
                    change_type: CHANGE_TYPE_STATS.to_string(),
                    change_reason: Some(reason),
                    old_stats: Some(old_stats),
                    new_stats: Some(new_stats),
                    related_comment_ids: Vec::new(),
                    created_at: now,
                };
                (note, Some(log), ReconcileOutcome::Changed)
            }
        }
    };

    let verdict = evaluator.evaluate_note(&note.searchable_text(), &note.stats());
    note.is_important = verdict.is_important;
    note.matched_keywords = verdict.matched_keywords;
    note.updated_at = now;

    Reconciliation {
        note,
        tag_log,
        outcome,
    }
}

fn new_note(incoming: &ScrapedNote, now: DateTime<FixedOffset>) -> Note {
    Note {
        id: Uuid::new_v4(),
        note_id: incoming.note_id.clone(),
        note_url: incoming.note_url.clone(),
        note_type: incoming.note_type.clone(),
        author_user_id: incoming.author_user_id.clone(),
        author_nickname: incoming.author_nickname.clone(),
        author_avatar: incoming.author_avatar.clone(),
        title: incoming.title.clone(),
        description: incoming.description.clone(),
        tags: incoming.tags.clone().unwrap_or_default(),
        upload_time: incoming.upload_time,
        ip_location: incoming.ip_location.clone(),
        liked_count: incoming.liked_count,
        collected_count: incoming.collected_count,
        comment_count: incoming.comment_count,
        share_count: incoming.share_count,
        video_cover: incoming.video_cover.clone(),
        video_addr: incoming.video_addr.clone(),
        image_list: incoming.image_list.clone().unwrap_or_default(),
        is_new: true,
        is_changed: false,
        is_important: false,
        is_deleted: false,
        current_tags: vec![NoteTag::New],
        change_reason: None,
        matched_keywords: Vec::new(),
        important_comment_ids: Vec::new(),
        previous_stats: None,
        first_crawl_time: now,
        last_crawl_time: now,
        crawl_count: 1,
        created_at: now,
        updated_at: now,
    }
}

/// 只覆盖爬虫本次提供了的字段
fn refresh_descriptive_fields(note: &mut Note, incoming: &ScrapedNote) {
    fn take(target: &mut Option<String>, source: &Option<String>) {
        if source.is_some() {
            target.clone_from(source);
        }
    }

    take(&mut note.note_url, &incoming.note_url);
    take(&mut note.note_type, &incoming.note_type);
    take(&mut note.author_user_id, &incoming.author_user_id);
    take(&mut note.author_nickname, &incoming.author_nickname);
    take(&mut note.author_avatar, &incoming.author_avatar);
    take(&mut note.title, &incoming.title);
    take(&mut note.description, &incoming.description);
    take(&mut note.ip_location, &incoming.ip_location);
    take(&mut note.video_cover, &incoming.video_cover);
    take(&mut note.video_addr, &incoming.video_addr);

    if incoming.upload_time.is_some() {
        note.upload_time = incoming.upload_time;
    }
    if let Some(tags) = &incoming.tags {
        note.tags.clone_from(tags);
    }
    if let Some(images) = &incoming.image_list {
        note.image_list.clone_from(images);
    }
}

#[cfg(test)]
#[path = "reconciliation_test.rs"]
mod tests;
