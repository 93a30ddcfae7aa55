use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CrawlTasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CrawlTasks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CrawlTasks::TaskName).string_len(200).not_null())
                    .col(ColumnDef::new(CrawlTasks::Keyword).string_len(200).not_null())
                    .col(
                        ColumnDef::new(CrawlTasks::TargetCount)
                            .integer()
                            .not_null()
                            .default(200),
                    )
                    .col(ColumnDef::new(CrawlTasks::SortType).integer().not_null().default(1))
                    .col(ColumnDef::new(CrawlTasks::Cookies).text())
                    .col(
                        ColumnDef::new(CrawlTasks::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CrawlTasks::Progress).integer().not_null().default(0))
                    .col(ColumnDef::new(CrawlTasks::RunId).string_len(100))
                    .col(ColumnDef::new(CrawlTasks::WebhookUrl).string_len(500))
                    .col(ColumnDef::new(CrawlTasks::ScheduledTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlTasks::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CrawlTasks::FinishedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CrawlTasks::TotalCrawled)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CrawlTasks::NewNotes).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CrawlTasks::ChangedNotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CrawlTasks::ImportantNotes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CrawlTasks::ErrorMessage).text())
                    .col(
                        ColumnDef::new(CrawlTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CrawlTasks::UpdatedAt)
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
                    .name("idx_crawl_tasks_status")
                    .table(CrawlTasks::Table)
                    .col(CrawlTasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_crawl_tasks_keyword")
                    .table(CrawlTasks::Table)
                    .col(CrawlTasks::Keyword)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrawlTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CrawlTasks {
    Table,
    Id,
    TaskName,
    Keyword,
    TargetCount,
    SortType,
    Cookies,
    Status,
    Progress,
    RunId,
    WebhookUrl,
    ScheduledTime,
    StartedAt,
    FinishedAt,
    TotalCrawled,
    NewNotes,
    ChangedNotes,
    ImportantNotes,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
