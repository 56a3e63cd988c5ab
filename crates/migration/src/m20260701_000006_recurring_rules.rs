use sea_orm_migration::prelude::*;

use crate::m20260701_000001_users::Users;
use crate::m20260701_000002_accounts::Accounts;
use crate::m20260701_000003_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum RecurringRules {
    Table,
    Id,
    UserId,
    AccountId,
    CategoryId,
    AmountMinor,
    Description,
    Frequency,
    NextDueDate,
    EndDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecurringRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecurringRules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecurringRules::UserId).string().not_null())
                    .col(ColumnDef::new(RecurringRules::AccountId).string().not_null())
                    .col(ColumnDef::new(RecurringRules::CategoryId).string())
                    .col(
                        ColumnDef::new(RecurringRules::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringRules::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringRules::Frequency).string().not_null())
                    .col(
                        ColumnDef::new(RecurringRules::NextDueDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringRules::EndDate).date())
                    .col(
                        ColumnDef::new(RecurringRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RecurringRules::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringRules::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_rules-user_id")
                            .from(RecurringRules::Table, RecurringRules::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_rules-account_id")
                            .from(RecurringRules::Table, RecurringRules::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_rules-category_id")
                            .from(RecurringRules::Table, RecurringRules::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recurring_rules-is_active-next_due_date")
                    .table(RecurringRules::Table)
                    .col(RecurringRules::IsActive)
                    .col(RecurringRules::NextDueDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringRules::Table).to_owned())
            .await
    }
}
