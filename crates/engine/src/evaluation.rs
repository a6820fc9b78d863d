//! Commitment evaluation.
//!
//! Evaluation compares each [`CheckIn`] of a [`Commitment`] with the spend
//! reported by a [`SpendAggregator`] and rolls the results up:
//!
//! - `shortfall = max(committed - actual, 0)`
//! - `surplus = max(actual - committed, 0)`
//! - a check-in is met when its shortfall is zero
//! - the commitment is met when every check-in is met (an empty commitment
//!   is met)
//! - `total_shortfall` is the sum of the per-period shortfalls, so a surplus
//!   in one period never offsets a shortfall in another
//!
//! [`CheckIn`]: crate::CheckIn

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    Commitment, CommitmentId, EngineError, Money, PeriodStatus, ResultEngine, SpendAggregator,
};

/// Result of comparing one check-in with actual spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedCheckIn {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: PeriodStatus,
    pub committed_amount: Money,
    pub actual_amount: Money,
    pub shortfall: Money,
    pub surplus: Money,
    pub met: bool,
}

impl EvaluatedCheckIn {
    fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: PeriodStatus,
        committed_amount: Money,
        actual_amount: Money,
    ) -> ResultEngine<Self> {
        let shortfall = checked(committed_amount.checked_sub(actual_amount))?.max(Money::ZERO);
        let surplus = checked(actual_amount.checked_sub(committed_amount))?.max(Money::ZERO);
        Ok(Self {
            start,
            end,
            status,
            committed_amount,
            actual_amount,
            shortfall,
            surplus,
            met: shortfall.is_zero(),
        })
    }
}

fn checked(value: Option<Money>) -> ResultEngine<Money> {
    value.ok_or_else(|| EngineError::InvalidData("amount out of range".to_string()))
}

/// A fully evaluated commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedCommitment {
    pub id: CommitmentId,
    pub name: String,
    pub company: String,
    pub service: String,
    pub met: bool,
    pub total_committed: Money,
    pub total_actual: Money,
    pub total_shortfall: Money,
    /// Same order as the commitment's check-ins.
    pub checkins: Vec<EvaluatedCheckIn>,
}

/// Evaluates `commitment` against `aggregator` as of `now`.
///
/// An unconfigured aggregator is refused up front, even for a commitment
/// without check-ins. Every check-in is validated before the first
/// aggregator call, and the first aggregator error aborts the whole
/// evaluation: no partial result is ever returned.
pub async fn evaluate_commitment(
    commitment: &Commitment,
    aggregator: &dyn SpendAggregator,
    now: DateTime<Utc>,
) -> ResultEngine<EvaluatedCommitment> {
    aggregator.ensure_configured()?;
    commitment.validate()?;

    let mut checkins = Vec::with_capacity(commitment.checkins.len());
    let mut total_committed = Money::ZERO;
    let mut total_actual = Money::ZERO;
    let mut total_shortfall = Money::ZERO;
    let mut met = true;

    for checkin in &commitment.checkins {
        let actual = aggregator
            .total_spend(
                &commitment.company,
                &commitment.service,
                checkin.start,
                checkin.end,
            )
            .await?;

        let evaluated = EvaluatedCheckIn::new(
            checkin.start,
            checkin.end,
            PeriodStatus::classify(checkin.start, checkin.end, now),
            checkin.amount,
            actual,
        )?;
        tracing::debug!(
            commitment = commitment.id,
            status = %evaluated.status,
            committed = %evaluated.committed_amount,
            actual = %evaluated.actual_amount,
            "evaluated check-in"
        );

        total_committed = checked(total_committed.checked_add(evaluated.committed_amount))?;
        total_actual = checked(total_actual.checked_add(evaluated.actual_amount))?;
        total_shortfall = checked(total_shortfall.checked_add(evaluated.shortfall))?;
        met &= evaluated.met;
        checkins.push(evaluated);
    }

    Ok(EvaluatedCommitment {
        id: commitment.id,
        name: commitment.name.clone(),
        company: commitment.company.clone(),
        service: commitment.service.clone(),
        met,
        total_committed,
        total_actual,
        total_shortfall,
        checkins,
    })
}

/// Evaluates commitments with an injected [`SpendAggregator`].
#[derive(Clone, Default)]
pub struct Evaluator {
    aggregator: Option<Arc<dyn SpendAggregator>>,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("aggregator_configured", &self.aggregator.is_some())
            .finish()
    }
}

impl Evaluator {
    /// Return a builder for `Evaluator`. Help to build the struct.
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::default()
    }

    fn aggregator(&self) -> ResultEngine<&dyn SpendAggregator> {
        self.aggregator.as_deref().ok_or_else(|| {
            EngineError::Configuration("no spend aggregator configured".to_string())
        })
    }

    /// Evaluates a single commitment as of `now`.
    pub async fn evaluate(
        &self,
        commitment: &Commitment,
        now: DateTime<Utc>,
    ) -> ResultEngine<EvaluatedCommitment> {
        let aggregator = self.aggregator()?;
        evaluate_commitment(commitment, aggregator, now).await
    }

    /// Evaluates `commitments` in order, stopping at the first error.
    pub async fn evaluate_all(
        &self,
        commitments: &[Commitment],
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<EvaluatedCommitment>> {
        let aggregator = self.aggregator()?;
        let mut evaluated = Vec::with_capacity(commitments.len());
        for commitment in commitments {
            evaluated.push(evaluate_commitment(commitment, aggregator, now).await?);
        }
        Ok(evaluated)
    }
}

/// The builder for `Evaluator`
#[derive(Default)]
pub struct EvaluatorBuilder {
    aggregator: Option<Arc<dyn SpendAggregator>>,
}

impl EvaluatorBuilder {
    /// Pass the spend aggregator
    pub fn aggregator(mut self, aggregator: Arc<dyn SpendAggregator>) -> EvaluatorBuilder {
        self.aggregator = Some(aggregator);
        self
    }

    /// Construct `Evaluator`
    pub fn build(self) -> Evaluator {
        Evaluator {
            aggregator: self.aggregator,
        }
    }
}
