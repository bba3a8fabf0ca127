use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建作业公告表（对外可见的公共记录）
        manager
            .create_table(
                Table::create()
                    .table(AssignmentPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentPosts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssignmentPosts::Title).string().not_null())
                    .col(ColumnDef::new(AssignmentPosts::Content).text().not_null())
                    .col(
                        ColumnDef::new(AssignmentPosts::ClassLevel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentPosts::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentPosts::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentPosts::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignmentPosts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentPosts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业详情表（与公告表同生共死）
        manager
            .create_table(
                Table::create()
                    .table(AssignmentDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentDetails::PostId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AssignmentDetails::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(AssignmentDetails::MaxSubmissions)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(AssignmentDetails::MaxSubmissions).gte(0)),
                    )
                    .col(
                        ColumnDef::new(AssignmentDetails::CurrentSubmissions)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(AssignmentDetails::CurrentSubmissions).gte(0)),
                    )
                    .col(
                        ColumnDef::new(AssignmentDetails::AccessSecretHash)
                            .text()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentDetails::Table, AssignmentDetails::PostId)
                            .to(AssignmentPosts::Table, AssignmentPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().null())
                    .col(ColumnDef::new(Submissions::StudentName).string().not_null())
                    .col(ColumnDef::new(Submissions::FileUrl).text().not_null())
                    .col(ColumnDef::new(Submissions::FileName).string().not_null())
                    .col(ColumnDef::new(Submissions::Comment).text().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::IsChecked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::CheckedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::CheckedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(AssignmentPosts::Table, AssignmentPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交表按 (作业, 学生) 查询的索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_name")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentPosts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AssignmentPosts {
    Table,
    Id,
    Title,
    Content,
    ClassLevel,
    AuthorId,
    InstructorId,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssignmentDetails {
    Table,
    Id,
    PostId,
    DueDate,
    MaxSubmissions,
    CurrentSubmissions,
    AccessSecretHash,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    StudentName,
    FileUrl,
    FileName,
    Comment,
    SubmittedAt,
    IsChecked,
    CheckedBy,
    CheckedAt,
    Feedback,
}
