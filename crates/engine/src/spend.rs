//! Database-backed spend aggregation over `billing_events`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};

use crate::{EngineError, Money, ResultEngine, SpendAggregator, billing_events};

/// [`SpendAggregator`] summing `gross_cost_minor` from the billing store.
///
/// An aggregator built with [`DbSpendAggregator::unconfigured`] has no
/// backing data source and answers every query with a configuration error,
/// so a missing database is never mistaken for zero spend.
#[derive(Clone, Debug, Default)]
pub struct DbSpendAggregator {
    database: Option<DatabaseConnection>,
}

impl DbSpendAggregator {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database: Some(database),
        }
    }

    pub fn unconfigured() -> Self {
        Self { database: None }
    }

    fn database(&self) -> ResultEngine<&DatabaseConnection> {
        self.database
            .as_ref()
            .ok_or_else(|| EngineError::Configuration("database url is not set".to_string()))
    }
}

#[async_trait]
impl SpendAggregator for DbSpendAggregator {
    fn ensure_configured(&self) -> ResultEngine<()> {
        self.database().map(|_| ())
    }

    async fn total_spend(
        &self,
        company: &str,
        service: &str,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> ResultEngine<Money> {
        let db = self.database()?;

        let total: Option<Option<i64>> = billing_events::Entity::find()
            .select_only()
            .column_as(
                Expr::col(billing_events::Column::GrossCostMinor).sum(),
                "total",
            )
            .filter(billing_events::Column::Company.eq(company))
            .filter(billing_events::Column::AwsService.eq(service))
            .filter(billing_events::Column::EventTime.gte(period_start))
            .filter(billing_events::Column::EventTime.lt(period_end))
            .into_tuple()
            .one(db)
            .await?;

        Ok(Money::from_minor(total.flatten().unwrap_or(0)))
    }
}

/// Distinct companies present in the billing store, sorted.
pub async fn list_companies(db: &DatabaseConnection) -> ResultEngine<Vec<String>> {
    let companies: Vec<String> = billing_events::Entity::find()
        .select_only()
        .column(billing_events::Column::Company)
        .distinct()
        .order_by_asc(billing_events::Column::Company)
        .into_tuple()
        .all(db)
        .await?;
    Ok(companies)
}
