//! Events, vendors, attendees and registrations.
//!
//! List-valued fields (`vendor_ids`, `tags`, `service_areas`...) are JSON
//! arrays in `text` columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    Location,
    Category,
    MaxAttendees,
    PriceMinor,
    OrganizerId,
    VendorIds,
    AttendeeIds,
    Tags,
    IsPublic,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Description,
    ContactPerson,
    Address,
    VendorType,
    ServiceAreas,
    EventIds,
    IsActive,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Attendees {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Email,
    Phone,
    EventIds,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    AttendeeId,
    EventId,
    ConfirmationNumber,
    RegistrationDate,
    PaymentStatus,
    TicketPriceMinor,
    TicketType,
    PaymentMethod,
    CheckInStatus,
    CheckInTime,
    Notes,
}

fn json_list<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .text()
        .not_null()
        .default("[]")
        .to_owned()
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text())
                    .col(ColumnDef::new(Events::StartTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Events::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Events::Location).string())
                    .col(ColumnDef::new(Events::Category).string())
                    .col(
                        ColumnDef::new(Events::MaxAttendees)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::PriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::OrganizerId).string())
                    .col(json_list(Events::VendorIds))
                    .col(json_list(Events::AttendeeIds))
                    .col(json_list(Events::Tags))
                    .col(
                        ColumnDef::new(Events::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Events::Status)
                            .string()
                            .not_null()
                            .default("DRAFT"),
                    )
                    .col(timestamp(Events::CreatedAt))
                    .col(timestamp(Events::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-start_time")
                    .table(Events::Table)
                    .col(Events::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::Name).string().not_null())
                    .col(ColumnDef::new(Vendors::Email).string().not_null())
                    .col(ColumnDef::new(Vendors::Phone).string())
                    .col(ColumnDef::new(Vendors::Description).text())
                    .col(ColumnDef::new(Vendors::ContactPerson).string())
                    .col(ColumnDef::new(Vendors::Address).string())
                    .col(
                        ColumnDef::new(Vendors::VendorType)
                            .string()
                            .not_null()
                            .default("OTHER"),
                    )
                    .col(json_list(Vendors::ServiceAreas))
                    .col(json_list(Vendors::EventIds))
                    .col(
                        ColumnDef::new(Vendors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Vendors::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(Vendors::CreatedAt))
                    .col(timestamp(Vendors::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendees::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendees::UserId).string())
                    .col(ColumnDef::new(Attendees::FirstName).string().not_null())
                    .col(ColumnDef::new(Attendees::LastName).string().not_null())
                    .col(ColumnDef::new(Attendees::Email).string().not_null())
                    .col(ColumnDef::new(Attendees::Phone).string())
                    .col(json_list(Attendees::EventIds))
                    .col(
                        ColumnDef::new(Attendees::Status)
                            .string()
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(timestamp(Attendees::CreatedAt))
                    .col(timestamp(Attendees::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-attendees-email-unique")
                    .table(Attendees::Table)
                    .col(Attendees::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::AttendeeId).string().not_null())
                    .col(ColumnDef::new(Registrations::EventId).string().not_null())
                    .col(
                        ColumnDef::new(Registrations::ConfirmationNumber)
                            .string()
                            .not_null(),
                    )
                    .col(timestamp(Registrations::RegistrationDate))
                    .col(
                        ColumnDef::new(Registrations::PaymentStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Registrations::TicketPriceMinor).big_integer())
                    .col(ColumnDef::new(Registrations::TicketType).string())
                    .col(ColumnDef::new(Registrations::PaymentMethod).string())
                    .col(
                        ColumnDef::new(Registrations::CheckInStatus)
                            .string()
                            .not_null()
                            .default("NOT_CHECKED_IN"),
                    )
                    .col(ColumnDef::new(Registrations::CheckInTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Registrations::Notes).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-registrations-event_id")
                    .table(Registrations::Table)
                    .col(Registrations::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        Ok(())
    }
}
