use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 blog_posts 表
        manager
            .create_table(
                Table::create()
                    .table(BlogPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPost::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::Blog)
                            .string()
                            .not_null()
                            .default("default"),
                    )
                    .col(ColumnDef::new(BlogPost::Title).string().not_null())
                    .col(
                        ColumnDef::new(BlogPost::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::ModifiedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BlogPost::Content).text().not_null())
                    .col(ColumnDef::new(BlogPost::Excerpt).text().not_null())
                    .col(ColumnDef::new(BlogPost::PosterUri).text().null())
                    .col(ColumnDef::new(BlogPost::CloudStorageObject).string().null())
                    .to_owned(),
            )
            .await?;

        // 列表查询：按 blog 过滤，modified_on 倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_blog_posts_blog_modified")
                    .table(BlogPost::Table)
                    .col(BlogPost::Blog)
                    .col(BlogPost::ModifiedOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_blog_posts_blog_modified").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BlogPost::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPost {
    #[sea_orm(iden = "blog_posts")]
    Table,
    Id,
    Blog,
    Title,
    CreatedOn,
    ModifiedOn,
    Content,
    Excerpt,
    PosterUri,
    CloudStorageObject,
}
