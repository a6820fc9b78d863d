pub use sea_orm_migration::prelude::*;

mod m20260301_000000_billing_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000000_billing_events::Migration)]
    }
}

/// SQL for the full schema, as SQLite sees it.
///
/// Used to preview what `Migrator::up` will create without touching a
/// database.
pub fn schema_sql() -> Vec<String> {
    vec![
        m20260301_000000_billing_events::billing_events_table().to_string(SqliteQueryBuilder),
        m20260301_000000_billing_events::billing_events_lookup_index()
            .to_string(SqliteQueryBuilder),
    ]
}
