//! Initial schema migration - creates all ledger tables from scratch.
//!
//! - `accounts`: one economic record per (community, member) pair
//! - `transactions`: append-only audit trail of balance changes
//! - `master_items`: purchasable catalog definitions
//! - `master_incomes`: recurring income-source catalog definitions
//! - `user_items`: denormalized per-account item grants
//! - `user_incomes`: denormalized per-account income grants
//!
//! The item↔income cross-links are deliberately *not* FK-backed: the link
//! graph may be mutual, so the second side of a pair must be insertable
//! before the loop is closed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    CommunityId,
    MemberId,
    DisplayName,
    Cash,
    Bank,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    CommunityId,
    Kind,
    Amount,
    OccurredAt,
    Description,
}

#[derive(Iden)]
enum MasterItems {
    Table,
    Id,
    Name,
    Price,
    OneTime,
    InInventory,
    Command,
    LinkedIncomeId,
}

#[derive(Iden)]
enum MasterIncomes {
    Table,
    Id,
    Name,
    Amount,
    IsPercent,
    CooldownSecs,
    LinkedItemId,
}

#[derive(Iden)]
enum UserItems {
    Table,
    Id,
    AccountId,
    CommunityId,
    MasterItemId,
    Name,
    Price,
    OneTime,
    InInventory,
    Command,
    LinkedIncomeId,
}

#[derive(Iden)]
enum UserIncomes {
    Table,
    Id,
    AccountId,
    CommunityId,
    MasterIncomeId,
    Name,
    Amount,
    IsPercent,
    CooldownSecs,
    LinkedItemId,
    LastClaimed,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::CommunityId).string().not_null())
                    .col(ColumnDef::new(Accounts::MemberId).string().not_null())
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Cash)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::Bank)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-community_id-member_id-unique")
                    .table(Accounts::Table)
                    .col(Accounts::CommunityId)
                    .col(Accounts::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CommunityId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Master items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MasterItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // NOCASE so the unique index matches the engine's
                    // case-insensitive name rule.
                    .col(
                        ColumnDef::new(MasterItems::Name)
                            .string()
                            .not_null()
                            .extra("COLLATE NOCASE"),
                    )
                    .col(ColumnDef::new(MasterItems::Price).big_integer().not_null())
                    .col(ColumnDef::new(MasterItems::OneTime).boolean().not_null())
                    .col(
                        ColumnDef::new(MasterItems::InInventory)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterItems::Command).string())
                    .col(ColumnDef::new(MasterItems::LinkedIncomeId).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-master_items-name-unique")
                    .table(MasterItems::Table)
                    .col(MasterItems::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Master incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MasterIncomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterIncomes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MasterIncomes::Name)
                            .string()
                            .not_null()
                            .extra("COLLATE NOCASE"),
                    )
                    .col(
                        ColumnDef::new(MasterIncomes::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIncomes::IsPercent)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIncomes::CooldownSecs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterIncomes::LinkedItemId).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-master_incomes-name-unique")
                    .table(MasterIncomes::Table)
                    .col(MasterIncomes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. User item grants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(UserItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserItems::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(UserItems::CommunityId).string().not_null())
                    .col(
                        ColumnDef::new(UserItems::MasterItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserItems::Name).string().not_null())
                    .col(ColumnDef::new(UserItems::Price).big_integer().not_null())
                    .col(ColumnDef::new(UserItems::OneTime).boolean().not_null())
                    .col(ColumnDef::new(UserItems::InInventory).boolean().not_null())
                    .col(ColumnDef::new(UserItems::Command).string())
                    .col(ColumnDef::new(UserItems::LinkedIncomeId).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_items-account_id")
                            .from(UserItems::Table, UserItems::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_items-account_id")
                    .table(UserItems::Table)
                    .col(UserItems::AccountId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. User income grants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(UserIncomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserIncomes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserIncomes::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserIncomes::CommunityId).string().not_null())
                    .col(
                        ColumnDef::new(UserIncomes::MasterIncomeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserIncomes::Name).string().not_null())
                    .col(ColumnDef::new(UserIncomes::Amount).big_integer().not_null())
                    .col(ColumnDef::new(UserIncomes::IsPercent).boolean().not_null())
                    .col(
                        ColumnDef::new(UserIncomes::CooldownSecs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserIncomes::LinkedItemId).big_integer())
                    .col(ColumnDef::new(UserIncomes::LastClaimed).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_incomes-account_id")
                            .from(UserIncomes::Table, UserIncomes::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_incomes-account_id")
                    .table(UserIncomes::Table)
                    .col(UserIncomes::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MasterIncomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MasterItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
