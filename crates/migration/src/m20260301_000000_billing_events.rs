//! Billing events store.
//!
//! - `billing_events`: one row per billed charge, amounts in minor units
//!
//! The composite index matches the aggregator's lookup: equality on
//! company and service, then a range on `event_time`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum BillingEvents {
    Table,
    Id,
    Company,
    AwsService,
    EventTime,
    GrossCostMinor,
}

/// `CREATE TABLE billing_events`.
pub fn billing_events_table() -> TableCreateStatement {
    Table::create()
        .table(BillingEvents::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(BillingEvents::Id)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(BillingEvents::Company).string().not_null())
        .col(ColumnDef::new(BillingEvents::AwsService).string().not_null())
        .col(
            ColumnDef::new(BillingEvents::EventTime)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(BillingEvents::GrossCostMinor)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

/// Lookup index for `(company, aws_service, event_time)`.
pub fn billing_events_lookup_index() -> IndexCreateStatement {
    Index::create()
        .name("idx-billing_events-company-service-time")
        .table(BillingEvents::Table)
        .col(BillingEvents::Company)
        .col(BillingEvents::AwsService)
        .col(BillingEvents::EventTime)
        .if_not_exists()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(billing_events_table()).await?;
        manager
            .create_index(billing_events_lookup_index())
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillingEvents::Table).to_owned())
            .await?;
        Ok(())
    }
}
