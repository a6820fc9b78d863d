//! Compact view of an evaluated commitment.

use crate::{CommitmentId, EvaluatedCommitment, Money};

/// An [`EvaluatedCommitment`] without per-check-in detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentSummary {
    pub id: CommitmentId,
    pub name: String,
    pub service: String,
    pub met: bool,
    pub checkin_count: usize,
    pub total_committed: Money,
    pub total_actual: Money,
    pub total_shortfall: Money,
}

/// Projects `evaluated` into a summary. Totals are copied, never recomputed.
pub fn summarize(evaluated: &EvaluatedCommitment) -> CommitmentSummary {
    CommitmentSummary {
        id: evaluated.id,
        name: evaluated.name.clone(),
        service: evaluated.service.clone(),
        met: evaluated.met,
        checkin_count: evaluated.checkins.len(),
        total_committed: evaluated.total_committed,
        total_actual: evaluated.total_actual,
        total_shortfall: evaluated.total_shortfall,
    }
}

impl From<&EvaluatedCommitment> for CommitmentSummary {
    fn from(value: &EvaluatedCommitment) -> Self {
        summarize(value)
    }
}
