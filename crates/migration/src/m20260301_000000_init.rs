//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `sessions`: cookie sessions issued at login
//! - `sponsors`: people or organizations that send money
//! - `funds`: named buckets with a target share of receipts
//! - `receipts`: incoming money
//! - `fund_distributions`: automatic split of a receipt across active funds
//! - `manual_fund_distributions`: user allocations of unallocated money
//! - `fund_transfers`: moves between funds
//! - `expense_categories`: cost classification
//! - `nomenclature`: catalog of purchasable items
//! - `costs`: outgoing money

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    PasswordHash,
    Salt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Token,
    Username,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum Sponsors {
    Table,
    Id,
    Name,
    NameNorm,
    Contact,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Funds {
    Table,
    Id,
    Name,
    NameNorm,
    PercentageBp,
    Active,
    Description,
}

#[derive(Iden)]
enum Receipts {
    Table,
    Id,
    AmountMinor,
    Date,
    SponsorId,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum FundDistributions {
    Table,
    Id,
    ReceiptId,
    FundId,
    PercentageBp,
    AmountMinor,
}

#[derive(Iden)]
enum ManualFundDistributions {
    Table,
    Id,
    FundId,
    AmountMinor,
    Date,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum FundTransfers {
    Table,
    Id,
    FromFundId,
    ToFundId,
    AmountMinor,
    Date,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum ExpenseCategories {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
}

#[derive(Iden)]
enum Nomenclature {
    Table,
    Id,
    Name,
    NameNorm,
    Unit,
    CategoryId,
}

#[derive(Iden)]
enum Costs {
    Table,
    Id,
    AmountMinor,
    CategoryId,
    NomenclatureId,
    FundId,
    Date,
    Description,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users and sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Salt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::Username).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-username")
                            .from(Sessions::Table, Sessions::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sponsors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sponsors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sponsors::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Sponsors::Name).string().not_null())
                    .col(ColumnDef::new(Sponsors::NameNorm).string().not_null())
                    .col(ColumnDef::new(Sponsors::Contact).string())
                    .col(ColumnDef::new(Sponsors::Note).string())
                    .col(
                        ColumnDef::new(Sponsors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sponsors-name_norm-unique")
                    .table(Sponsors::Table)
                    .col(Sponsors::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Funds
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Funds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Funds::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Funds::Name).string().not_null())
                    .col(ColumnDef::new(Funds::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(Funds::PercentageBp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Funds::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Funds::Description).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-funds-name_norm-unique")
                    .table(Funds::Table)
                    .col(Funds::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Receipts and automatic distributions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Receipts::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Receipts::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Receipts::Date).date().not_null())
                    .col(ColumnDef::new(Receipts::SponsorId).blob())
                    .col(ColumnDef::new(Receipts::Description).string())
                    .col(
                        ColumnDef::new(Receipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receipts-sponsor_id")
                            .from(Receipts::Table, Receipts::SponsorId)
                            .to(Sponsors::Table, Sponsors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-receipts-date")
                    .table(Receipts::Table)
                    .col(Receipts::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FundDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FundDistributions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FundDistributions::ReceiptId).blob().not_null())
                    .col(ColumnDef::new(FundDistributions::FundId).blob().not_null())
                    .col(
                        ColumnDef::new(FundDistributions::PercentageBp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FundDistributions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fund_distributions-receipt_id")
                            .from(FundDistributions::Table, FundDistributions::ReceiptId)
                            .to(Receipts::Table, Receipts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fund_distributions-fund_id")
                            .from(FundDistributions::Table, FundDistributions::FundId)
                            .to(Funds::Table, Funds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fund_distributions-receipt_id")
                    .table(FundDistributions::Table)
                    .col(FundDistributions::ReceiptId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Manual distributions and transfers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ManualFundDistributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManualFundDistributions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ManualFundDistributions::FundId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManualFundDistributions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ManualFundDistributions::Date).date().not_null())
                    .col(ColumnDef::new(ManualFundDistributions::Note).string())
                    .col(
                        ColumnDef::new(ManualFundDistributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-manual_fund_distributions-fund_id")
                            .from(
                                ManualFundDistributions::Table,
                                ManualFundDistributions::FundId,
                            )
                            .to(Funds::Table, Funds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FundTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FundTransfers::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FundTransfers::FromFundId).blob().not_null())
                    .col(ColumnDef::new(FundTransfers::ToFundId).blob().not_null())
                    .col(
                        ColumnDef::new(FundTransfers::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransfers::Date).date().not_null())
                    .col(ColumnDef::new(FundTransfers::Note).string())
                    .col(
                        ColumnDef::new(FundTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fund_transfers-from_fund_id")
                            .from(FundTransfers::Table, FundTransfers::FromFundId)
                            .to(Funds::Table, Funds::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fund_transfers-to_fund_id")
                            .from(FundTransfers::Table, FundTransfers::ToFundId)
                            .to(Funds::Table, Funds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expense categories and nomenclature
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .col(ColumnDef::new(ExpenseCategories::NameNorm).string().not_null())
                    .col(ColumnDef::new(ExpenseCategories::Description).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_categories-name_norm-unique")
                    .table(ExpenseCategories::Table)
                    .col(ExpenseCategories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Nomenclature::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nomenclature::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nomenclature::Name).string().not_null())
                    .col(ColumnDef::new(Nomenclature::NameNorm).string().not_null())
                    .col(ColumnDef::new(Nomenclature::Unit).string())
                    .col(ColumnDef::new(Nomenclature::CategoryId).blob())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-nomenclature-category_id")
                            .from(Nomenclature::Table, Nomenclature::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-nomenclature-name_norm-unique")
                    .table(Nomenclature::Table)
                    .col(Nomenclature::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Costs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Costs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Costs::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Costs::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Costs::CategoryId).blob().not_null())
                    .col(ColumnDef::new(Costs::NomenclatureId).blob())
                    .col(ColumnDef::new(Costs::FundId).blob())
                    .col(ColumnDef::new(Costs::Date).date().not_null())
                    .col(ColumnDef::new(Costs::Description).string())
                    .col(
                        ColumnDef::new(Costs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-category_id")
                            .from(Costs::Table, Costs::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-nomenclature_id")
                            .from(Costs::Table, Costs::NomenclatureId)
                            .to(Nomenclature::Table, Nomenclature::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-fund_id")
                            .from(Costs::Table, Costs::FundId)
                            .to(Funds::Table, Funds::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-costs-date")
                    .table(Costs::Table)
                    .col(Costs::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Costs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Nomenclature::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FundTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManualFundDistributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FundDistributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Funds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sponsors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
