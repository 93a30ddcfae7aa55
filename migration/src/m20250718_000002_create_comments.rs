use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Comments::CommentId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Comments::NoteId).string_len(100).not_null())
                    .col(ColumnDef::new(Comments::CommenterUserId).string_len(100))
                    .col(ColumnDef::new(Comments::CommenterNickname).string_len(100))
                    .col(ColumnDef::new(Comments::Content).text())
                    .col(ColumnDef::new(Comments::LikeCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Comments::UploadTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Comments::IpLocation).string_len(100))
                    .col(ColumnDef::new(Comments::ParentCommentId).string_len(100))
                    .col(ColumnDef::new(Comments::RootCommentId).string_len(100))
                    .col(
                        ColumnDef::new(Comments::ContainsBusinessKeywords)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Comments::BusinessKeywordsFound).json().not_null())
                    .col(
                        ColumnDef::new(Comments::ImportanceScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Comments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_note_id")
                            .from(Comments::Table, Comments::NoteId)
                            .to(Notes::Table, Notes::NoteId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_note_id")
                    .table(Comments::Table)
                    .col(Comments::NoteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    CommentId,
    NoteId,
    CommenterUserId,
    CommenterNickname,
    Content,
    LikeCount,
    UploadTime,
    IpLocation,
    ParentCommentId,
    RootCommentId,
    ContainsBusinessKeywords,
    BusinessKeywordsFound,
    ImportanceScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    NoteId,
}
