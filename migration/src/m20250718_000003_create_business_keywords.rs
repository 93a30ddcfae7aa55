use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessKeywords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessKeywords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessKeywords::Keyword)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BusinessKeywords::Category).string_len(50))
                    .col(
                        ColumnDef::new(BusinessKeywords::Weight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(BusinessKeywords::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(BusinessKeywords::Description).string_len(200))
                    .col(
                        ColumnDef::new(BusinessKeywords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BusinessKeywords::UpdatedAt)
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
                    .name("idx_business_keywords_active")
                    .table(BusinessKeywords::Table)
                    .col(BusinessKeywords::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessKeywords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BusinessKeywords {
    Table,
    Id,
    Keyword,
    Category,
    Weight,
    IsActive,
    Description,
    CreatedAt,
    UpdatedAt,
}
