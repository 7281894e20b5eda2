//! Initial schema.
//!
//! - `users`: accounts with argon2 password hashes and a role
//! - `sessions`: server-side login sessions
//! - `income_entries`: income/OTP cash movements owned by a user
//! - `ticket_entries`: flight-ticket sales owned by a user

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Name,
    Role,
    LastSignedIn,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Token,
    UserId,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum IncomeEntries {
    Table,
    Id,
    UserId,
    UserName,
    Date,
    Time,
    Category,
    Amount,
    Description,
    Recipient,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TicketEntries {
    Table,
    Id,
    UserId,
    UserName,
    IssueDate,
    PassengerName,
    Pnr,
    TripType,
    FlightName,
    Origin,
    Destination,
    DepartureDate,
    ArrivalDate,
    ReturnDate,
    FromIssuer,
    BdNumber,
    QrNumber,
    TicketCopyUrl,
    TicketCopyFileName,
    Status,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("staff"),
                    )
                    .col(ColumnDef::new(Users::LastSignedIn).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sessions
        // ───────────────────────────────────────────────────────────────────
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
                    .col(ColumnDef::new(Sessions::UserId).integer().not_null())
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
                            .name("fk-sessions-user_id")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sessions-user_id")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Income entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(IncomeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncomeEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncomeEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(IncomeEntries::UserName).string().not_null())
                    .col(ColumnDef::new(IncomeEntries::Date).string().not_null())
                    .col(ColumnDef::new(IncomeEntries::Time).string().not_null())
                    .col(ColumnDef::new(IncomeEntries::Category).string().not_null())
                    .col(ColumnDef::new(IncomeEntries::Amount).big_integer().not_null())
                    .col(ColumnDef::new(IncomeEntries::Description).text().not_null())
                    .col(ColumnDef::new(IncomeEntries::Recipient).string())
                    .col(
                        ColumnDef::new(IncomeEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncomeEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-income_entries-user_id")
                            .from(IncomeEntries::Table, IncomeEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income_entries-user_id-date")
                    .table(IncomeEntries::Table)
                    .col(IncomeEntries::UserId)
                    .col(IncomeEntries::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Ticket entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TicketEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TicketEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(TicketEntries::UserName).string().not_null())
                    .col(ColumnDef::new(TicketEntries::IssueDate).string().not_null())
                    .col(
                        ColumnDef::new(TicketEntries::PassengerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TicketEntries::Pnr).string().not_null())
                    .col(ColumnDef::new(TicketEntries::TripType).string().not_null())
                    .col(ColumnDef::new(TicketEntries::FlightName).string().not_null())
                    .col(ColumnDef::new(TicketEntries::Origin).string().not_null())
                    .col(ColumnDef::new(TicketEntries::Destination).string().not_null())
                    .col(
                        ColumnDef::new(TicketEntries::DepartureDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TicketEntries::ArrivalDate).string().not_null())
                    .col(ColumnDef::new(TicketEntries::ReturnDate).string())
                    .col(ColumnDef::new(TicketEntries::FromIssuer).string().not_null())
                    .col(ColumnDef::new(TicketEntries::BdNumber).string())
                    .col(ColumnDef::new(TicketEntries::QrNumber).string())
                    .col(ColumnDef::new(TicketEntries::TicketCopyUrl).string())
                    .col(ColumnDef::new(TicketEntries::TicketCopyFileName).string())
                    .col(
                        ColumnDef::new(TicketEntries::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(TicketEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TicketEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ticket_entries-user_id")
                            .from(TicketEntries::Table, TicketEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ticket_entries-user_id-issue_date")
                    .table(TicketEntries::Table)
                    .col(TicketEntries::UserId)
                    .col(TicketEntries::IssueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(TicketEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeEntries::Table).to_owned())
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
