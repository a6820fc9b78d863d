//! Commitments API endpoints

use api_types::commitment::{
    CheckinStatus, CheckinView, CommitmentDetail, CommitmentDetailResponse,
    CommitmentSummaryView, CompanyCommitmentsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use engine::{
    CommitmentId, CommitmentSummary, EngineError, EvaluatedCheckIn, EvaluatedCommitment,
    PeriodStatus, format_timestamp, summarize,
};

use crate::{ServerError, server::ServerState};

/// Handle requests for the evaluated commitments of a company
pub async fn list(
    State(state): State<ServerState>,
    Path(company): Path<String>,
) -> Result<Json<CompanyCommitmentsResponse>, ServerError> {
    let commitments = state.catalog.commitments_for_company(&company)?;
    if commitments.is_empty() {
        return Err(EngineError::KeyNotFound(format!(
            "No commitments found for company '{company}'"
        ))
        .into());
    }

    let now = Utc::now();
    let evaluated = state.evaluator.evaluate_all(&commitments, now).await?;

    Ok(Json(CompanyCommitmentsResponse {
        company,
        commitments: evaluated
            .iter()
            .map(|evaluated| summary_view(summarize(evaluated)))
            .collect(),
    }))
}

/// Handle requests for a single evaluated commitment, check-ins included
pub async fn detail(
    State(state): State<ServerState>,
    Path((company, id)): Path<(String, String)>,
) -> Result<Json<CommitmentDetailResponse>, ServerError> {
    let id: CommitmentId = id
        .parse()
        .map_err(|_| ServerError::Generic(format!("invalid commitment id: {id}")))?;
    let commitment = state.catalog.commitment(&company, id)?;

    let now = Utc::now();
    let evaluated = state.evaluator.evaluate(&commitment, now).await?;

    Ok(Json(CommitmentDetailResponse {
        company,
        commitment: detail_view(evaluated),
    }))
}

fn summary_view(summary: CommitmentSummary) -> CommitmentSummaryView {
    CommitmentSummaryView {
        id: summary.id,
        name: summary.name,
        service: summary.service,
        met: summary.met,
        checkin_count: summary.checkin_count,
        total_committed: summary.total_committed.to_f64(),
        total_actual: summary.total_actual.to_f64(),
        total_shortfall: summary.total_shortfall.to_f64(),
    }
}

fn detail_view(evaluated: EvaluatedCommitment) -> CommitmentDetail {
    CommitmentDetail {
        id: evaluated.id,
        name: evaluated.name,
        company: evaluated.company,
        service: evaluated.service,
        met: evaluated.met,
        total_committed: evaluated.total_committed.to_f64(),
        total_actual: evaluated.total_actual.to_f64(),
        total_shortfall: evaluated.total_shortfall.to_f64(),
        checkins: evaluated.checkins.iter().map(checkin_view).collect(),
    }
}

fn checkin_view(checkin: &EvaluatedCheckIn) -> CheckinView {
    CheckinView {
        start: format_timestamp(checkin.start),
        end: format_timestamp(checkin.end),
        status: match checkin.status {
            PeriodStatus::Past => CheckinStatus::Past,
            PeriodStatus::Current => CheckinStatus::Current,
            PeriodStatus::Future => CheckinStatus::Future,
        },
        committed_amount: checkin.committed_amount.to_f64(),
        actual_amount: checkin.actual_amount.to_f64(),
        shortfall: checkin.shortfall.to_f64(),
        surplus: checkin.surplus.to_f64(),
        met: checkin.met,
    }
}
