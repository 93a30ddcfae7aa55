use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Notes::NoteId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Notes::NoteUrl).string_len(500))
                    .col(ColumnDef::new(Notes::NoteType).string_len(20))
                    .col(ColumnDef::new(Notes::AuthorUserId).string_len(100))
                    .col(ColumnDef::new(Notes::AuthorNickname).string_len(100))
                    .col(ColumnDef::new(Notes::AuthorAvatar).string_len(500))
                    .col(ColumnDef::new(Notes::Title).string_len(500))
                    .col(ColumnDef::new(Notes::Description).text())
                    .col(ColumnDef::new(Notes::Tags).json())
                    .col(ColumnDef::new(Notes::UploadTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Notes::IpLocation).string_len(100))
                    .col(ColumnDef::new(Notes::LikedCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Notes::CollectedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Notes::CommentCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Notes::ShareCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Notes::VideoCover).string_len(500))
                    .col(ColumnDef::new(Notes::VideoAddr).string_len(500))
                    .col(ColumnDef::new(Notes::ImageList).json())
                    .col(ColumnDef::new(Notes::CurrentTags).json().not_null())
                    .col(ColumnDef::new(Notes::IsNew).boolean().not_null().default(true))
                    .col(ColumnDef::new(Notes::IsChanged).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Notes::IsImportant)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notes::ChangeReason).string_len(500))
                    .col(ColumnDef::new(Notes::MatchedKeywords).json().not_null())
                    .col(ColumnDef::new(Notes::ImportantCommentIds).json().not_null())
                    .col(ColumnDef::new(Notes::PreviousStats).json())
                    .col(
                        ColumnDef::new(Notes::FirstCrawlTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notes::LastCrawlTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Notes::CrawlCount).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Notes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_crawl_time")
                    .table(Notes::Table)
                    .col(Notes::LastCrawlTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_flags")
                    .table(Notes::Table)
                    .col(Notes::IsNew)
                    .col(Notes::IsChanged)
                    .col(Notes::IsImportant)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_author")
                    .table(Notes::Table)
                    .col(Notes::AuthorUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NoteTagLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoteTagLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NoteTagLogs::NoteId).string_len(100).not_null())
                    .col(ColumnDef::new(NoteTagLogs::OldTags).json().not_null())
                    .col(ColumnDef::new(NoteTagLogs::NewTags).json().not_null())
                    .col(ColumnDef::new(NoteTagLogs::ChangeType).string_len(50).not_null())
                    .col(ColumnDef::new(NoteTagLogs::ChangeReason).string_len(500))
                    .col(ColumnDef::new(NoteTagLogs::OldStats).json())
                    .col(ColumnDef::new(NoteTagLogs::NewStats).json())
                    .col(ColumnDef::new(NoteTagLogs::RelatedCommentIds).json().not_null())
                    .col(
                        ColumnDef::new(NoteTagLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_tag_logs_note_id")
                            .from(NoteTagLogs::Table, NoteTagLogs::NoteId)
                            .to(Notes::Table, Notes::NoteId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_tag_logs_note_id")
                    .table(NoteTagLogs::Table)
                    .col(NoteTagLogs::NoteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NoteTagLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    Id,
    NoteId,
    NoteUrl,
    NoteType,
    AuthorUserId,
    AuthorNickname,
    AuthorAvatar,
    Title,
    Description,
    Tags,
    UploadTime,
    IpLocation,
    LikedCount,
    CollectedCount,
    CommentCount,
    ShareCount,
    VideoCover,
    VideoAddr,
    ImageList,
    CurrentTags,
    IsNew,
    IsChanged,
    IsImportant,
    ChangeReason,
    MatchedKeywords,
    ImportantCommentIds,
    PreviousStats,
    FirstCrawlTime,
    LastCrawlTime,
    CrawlCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NoteTagLogs {
    Table,
    Id,
    NoteId,
    OldTags,
    NewTags,
    ChangeType,
    ChangeReason,
    OldStats,
    NewStats,
    RelatedCommentIds,
    CreatedAt,
}
