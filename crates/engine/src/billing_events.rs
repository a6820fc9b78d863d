//! Billing events: the raw spend records the aggregator sums over.
//!
//! Events are loaded from a billing CSV export with (at least) the columns
//! `datetime`, `company`, `aws_service` and `gross_cost`. Amounts are stored
//! as integer minor units so sums in the database stay exact.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, TransactionTrait, entity::prelude::*};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{parse_timestamp, required_text},
};

/// Rows per `INSERT` statement, well below SQLite's bound-parameter limit.
const INSERT_CHUNK: usize = 500;

/// A single billed charge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingEvent {
    pub company: String,
    pub service: String,
    pub event_time: DateTime<Utc>,
    pub gross_cost: Money,
}

/// One CSV row as exported by the billing system.
#[derive(Debug, Deserialize)]
struct BillingRecord {
    datetime: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    aws_service: String,
    gross_cost: String,
}

impl TryFrom<BillingRecord> for BillingEvent {
    type Error = EngineError;

    fn try_from(record: BillingRecord) -> Result<Self, Self::Error> {
        let event_time = parse_timestamp(&record.datetime, "datetime")?;
        let gross_cost: Money = record.gross_cost.parse().map_err(|_| {
            EngineError::InvalidData(format!("invalid gross_cost: {}", record.gross_cost))
        })?;
        Ok(Self {
            company: required_text(&record.company, "company")?,
            service: required_text(&record.aws_service, "aws_service")?,
            event_time,
            gross_cost,
        })
    }
}

/// Parses a billing CSV.
///
/// Stops after `limit` rows when given. The first malformed row fails the
/// whole read, naming its 1-based row number.
pub fn read_billing_csv<R: std::io::Read>(
    reader: R,
    limit: Option<usize>,
) -> ResultEngine<Vec<BillingEvent>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();

    for (index, record) in csv_reader.deserialize::<BillingRecord>().enumerate() {
        if limit.is_some_and(|limit| index >= limit) {
            break;
        }
        let row = index + 1;
        let event = record
            .map_err(EngineError::from)
            .and_then(BillingEvent::try_from)
            .map_err(|err| match err {
                EngineError::InvalidData(msg) => {
                    EngineError::InvalidData(format!("row {row}: {msg}"))
                }
                other => EngineError::InvalidData(format!("row {row}: {other}")),
            })?;
        events.push(event);
    }

    Ok(events)
}

/// Stores `events`, optionally removing every existing event first.
///
/// Everything happens in one database transaction. Returns the number of
/// inserted rows.
pub async fn insert_billing_events(
    db: &DatabaseConnection,
    events: &[BillingEvent],
    truncate: bool,
) -> ResultEngine<u64> {
    let models = events
        .iter()
        .map(ActiveModel::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    let db_tx = db.begin().await?;
    if truncate {
        let deleted = Entity::delete_many().exec(&db_tx).await?;
        tracing::info!("truncated billing_events ({} row(s))", deleted.rows_affected);
    }
    for chunk in models.chunks(INSERT_CHUNK) {
        Entity::insert_many(chunk.to_vec())
            .exec_without_returning(&db_tx)
            .await?;
    }
    db_tx.commit().await?;

    Ok(models.len() as u64)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "billing_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company: String,
    pub aws_service: String,
    pub event_time: DateTimeUtc,
    pub gross_cost_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&BillingEvent> for ActiveModel {
    type Error = EngineError;

    fn try_from(event: &BillingEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            company: ActiveValue::Set(event.company.clone()),
            aws_service: ActiveValue::Set(event.service.clone()),
            event_time: ActiveValue::Set(event.event_time),
            gross_cost_minor: ActiveValue::Set(event.gross_cost.to_minor()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const CSV: &str = "\
datetime,company,aws_service,gross_cost,region
2024-01-03 10:00:00,cyberdyne,s3,12.345,us-east-1
2024-01-04 11:30:00,ingen,ec2,100,eu-west-1
2024-01-05 00:00:00,cyberdyne,s3,0.125,us-east-1
";

    #[test]
    fn parses_rows_and_quantizes_cost() {
        let events = read_billing_csv(CSV.as_bytes(), None).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            BillingEvent {
                company: "cyberdyne".to_string(),
                service: "s3".to_string(),
                event_time: Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap(),
                gross_cost: Money::from_minor(1234),
            }
        );
        assert_eq!(events[2].gross_cost, Money::from_minor(12));
    }

    #[test]
    fn honours_limit() {
        let events = read_billing_csv(CSV.as_bytes(), Some(2)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].company, "ingen");
    }

    #[test]
    fn rejects_blank_company_with_row_number() {
        let csv = "datetime,company,aws_service,gross_cost\n\
                   2024-01-03 10:00:00,cyberdyne,s3,1\n\
                   2024-01-03 10:00:00,  ,s3,1\n";
        let err = read_billing_csv(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(&err, EngineError::InvalidData(msg) if msg.starts_with("row 2:")));
    }

    #[test]
    fn rejects_bad_datetime_and_cost() {
        let bad_time = "datetime,company,aws_service,gross_cost\n2024-01-03,a,s3,1\n";
        assert!(read_billing_csv(bad_time.as_bytes(), None).is_err());

        let bad_cost = "datetime,company,aws_service,gross_cost\n2024-01-03 00:00:00,a,s3,abc\n";
        let err = read_billing_csv(bad_cost.as_bytes(), None).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Data);
    }
}
