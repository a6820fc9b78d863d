use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use engine::{
    CheckIn, Commitment, DbSpendAggregator, EngineError, ErrorKind, Evaluator, Money,
    PeriodStatus, SpendAggregator, summarize,
};

/// Serves spend keyed by period start and records every call.
#[derive(Default)]
struct FixedSpend {
    by_start: HashMap<DateTime<Utc>, Money>,
    calls: Mutex<Vec<(String, String, DateTime<Utc>, DateTime<Utc>)>>,
}

impl FixedSpend {
    fn with(entries: &[(DateTime<Utc>, &str)]) -> Self {
        Self {
            by_start: entries
                .iter()
                .map(|(start, amount)| (*start, amount.parse().unwrap()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SpendAggregator for FixedSpend {
    async fn total_spend(
        &self,
        company: &str,
        service: &str,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Money, EngineError> {
        self.calls.lock().unwrap().push((
            company.to_string(),
            service.to_string(),
            period_start,
            period_end,
        ));
        Ok(self
            .by_start
            .get(&period_start)
            .copied()
            .unwrap_or(Money::ZERO))
    }
}

fn month(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

fn quarterly(amount: &str) -> Commitment {
    let amount: Money = amount.parse().unwrap();
    Commitment {
        id: 7,
        name: "S3 Q1".to_string(),
        company: "cyberdyne".to_string(),
        service: "s3".to_string(),
        checkins: vec![
            CheckIn::new(month(2024, 1), month(2024, 2), amount).unwrap(),
            CheckIn::new(month(2024, 2), month(2024, 3), amount).unwrap(),
            CheckIn::new(month(2024, 3), month(2024, 4), amount).unwrap(),
        ],
    }
}

fn evaluator(aggregator: Arc<FixedSpend>) -> Evaluator {
    Evaluator::builder().aggregator(aggregator).build()
}

#[tokio::test]
async fn mixed_periods_report_shortfall_and_surplus() {
    let spend = Arc::new(FixedSpend::with(&[
        (month(2024, 1), "900"),
        (month(2024, 2), "1000"),
        (month(2024, 3), "1100"),
    ]));
    let now = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();

    let evaluated = evaluator(spend.clone())
        .evaluate(&quarterly("1000"), now)
        .await
        .unwrap();

    assert!(!evaluated.met);
    assert_eq!(evaluated.total_committed.to_string(), "3000.00");
    assert_eq!(evaluated.total_actual.to_string(), "3000.00");
    assert_eq!(evaluated.total_shortfall.to_string(), "100.00");

    let statuses: Vec<_> = evaluated.checkins.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![PeriodStatus::Past, PeriodStatus::Current, PeriodStatus::Future]
    );

    let jan = &evaluated.checkins[0];
    assert_eq!(jan.shortfall.to_string(), "100.00");
    assert_eq!(jan.surplus, Money::ZERO);
    assert!(!jan.met);

    let feb = &evaluated.checkins[1];
    assert_eq!(feb.shortfall, Money::ZERO);
    assert_eq!(feb.surplus, Money::ZERO);
    assert!(feb.met);

    let mar = &evaluated.checkins[2];
    assert_eq!(mar.shortfall, Money::ZERO);
    assert_eq!(mar.surplus.to_string(), "100.00");
    assert!(mar.met);

    let calls = spend.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        (
            "cyberdyne".to_string(),
            "s3".to_string(),
            month(2024, 1),
            month(2024, 2)
        )
    );
}

#[tokio::test]
async fn commitment_without_checkins_is_met() {
    let spend = Arc::new(FixedSpend::default());
    let commitment = Commitment {
        checkins: Vec::new(),
        ..quarterly("1000")
    };

    let evaluated = evaluator(spend.clone())
        .evaluate(&commitment, month(2024, 2))
        .await
        .unwrap();

    assert!(evaluated.met);
    assert_eq!(evaluated.total_committed.to_string(), "0.00");
    assert_eq!(evaluated.total_actual.to_string(), "0.00");
    assert_eq!(evaluated.total_shortfall.to_string(), "0.00");
    assert!(evaluated.checkins.is_empty());
    assert_eq!(spend.call_count(), 0);
}

#[tokio::test]
async fn exact_spend_meets_every_period() {
    let spend = Arc::new(FixedSpend::with(&[
        (month(2024, 1), "1000"),
        (month(2024, 2), "1000"),
        (month(2024, 3), "1000"),
    ]));

    let evaluated = evaluator(spend)
        .evaluate(&quarterly("1000"), month(2024, 6))
        .await
        .unwrap();

    assert!(evaluated.met);
    assert_eq!(evaluated.total_shortfall.to_string(), "0.00");
    assert!(evaluated.checkins.iter().all(|c| c.met));
    assert!(
        evaluated
            .checkins
            .iter()
            .all(|c| c.status == PeriodStatus::Past)
    );
}

#[tokio::test]
async fn inverted_period_fails_before_querying_spend() {
    let spend = Arc::new(FixedSpend::default());
    let mut commitment = quarterly("1000");
    // Bypasses `CheckIn::new` on purpose.
    commitment.checkins[1] = CheckIn {
        start: month(2024, 3),
        end: month(2024, 2),
        amount: Money::from_minor(100_000),
    };

    let err = evaluator(spend.clone())
        .evaluate(&commitment, month(2024, 2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Data);
    assert_eq!(spend.call_count(), 0);
}

#[tokio::test]
async fn aggregator_without_data_source_is_a_configuration_error() {
    let evaluator = Evaluator::builder()
        .aggregator(Arc::new(DbSpendAggregator::unconfigured()))
        .build();

    let err = evaluator
        .evaluate(&quarterly("1000"), month(2024, 2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_ne!(err.kind(), ErrorKind::Data);
}

#[tokio::test]
async fn aggregator_without_data_source_refuses_commitment_without_checkins() {
    let evaluator = Evaluator::builder()
        .aggregator(Arc::new(DbSpendAggregator::unconfigured()))
        .build();
    let commitment = Commitment {
        checkins: Vec::new(),
        ..quarterly("1000")
    };

    let err = evaluator
        .evaluate(&commitment, month(2024, 2))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = evaluator
        .evaluate_all(&[commitment], month(2024, 2))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn surplus_never_offsets_shortfall() {
    let spend = Arc::new(FixedSpend::with(&[
        (month(2024, 1), "0"),
        (month(2024, 2), "5000"),
        (month(2024, 3), "1000"),
    ]));

    let evaluated = evaluator(spend)
        .evaluate(&quarterly("1000"), month(2024, 6))
        .await
        .unwrap();

    assert!(!evaluated.met);
    assert_eq!(evaluated.total_actual.to_string(), "6000.00");
    assert_eq!(evaluated.total_shortfall.to_string(), "1000.00");
}

#[tokio::test]
async fn evaluation_is_repeatable() {
    let spend = Arc::new(FixedSpend::with(&[
        (month(2024, 1), "999.99"),
        (month(2024, 2), "0.01"),
    ]));
    let evaluator = evaluator(spend);
    let now = month(2024, 2);
    let commitment = quarterly("1000");

    let first = evaluator.evaluate(&commitment, now).await.unwrap();
    let second = evaluator.evaluate(&commitment, now).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(summarize(&first), summarize(&second));
    assert_eq!(first.checkins[0].shortfall.to_string(), "0.01");
}
