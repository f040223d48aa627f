//! Migration: Create employee profiles table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Foreign key declared inline; SQLite cannot add it afterwards
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::UserId).integer().null().unique_key())
                    .col(ColumnDef::new(Employees::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::Email).string_len(100).not_null().unique_key())
                    .col(
                        ColumnDef::new(Employees::Phone)
                            .string_len(20)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Employees::Department).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::Position).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::Salary).decimal_len(16, 2).not_null())
                    .col(ColumnDef::new(Employees::HireDate).date().not_null())
                    .col(
                        ColumnDef::new(Employees::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_user_id")
                            .from(Employees::Table, Employees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters on the active flag
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_is_active")
                    .table(Employees::Table)
                    .col(Employees::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Email,
    Phone,
    Department,
    Position,
    Salary,
    HireDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
