use serde::{Deserialize, Serialize};

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthResponse {
        pub status: String,
        pub service: String,
        /// Whether a billing database url was configured at startup.
        pub database_url_configured: bool,
        pub database_reachable: bool,
    }
}

pub mod company {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyListResponse {
        /// Sorted, without duplicates.
        pub companies: Vec<String>,
    }
}

pub mod commitment {
    use super::*;

    /// Position of a check-in period relative to the reference instant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CheckinStatus {
        Past,
        Current,
        Future,
    }

    /// Money fields are decimal amounts rounded to two places.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommitmentSummaryView {
        pub id: i64,
        pub name: String,
        pub service: String,
        pub met: bool,
        pub checkin_count: usize,
        pub total_committed: f64,
        pub total_actual: f64,
        pub total_shortfall: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyCommitmentsResponse {
        pub company: String,
        pub commitments: Vec<CommitmentSummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CheckinView {
        /// `YYYY-MM-DD HH:MM:SS`, UTC.
        pub start: String,
        /// `YYYY-MM-DD HH:MM:SS`, UTC. Exclusive.
        pub end: String,
        pub status: CheckinStatus,
        pub committed_amount: f64,
        pub actual_amount: f64,
        pub shortfall: f64,
        pub surplus: f64,
        pub met: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommitmentDetail {
        pub id: i64,
        pub name: String,
        pub company: String,
        pub service: String,
        pub met: bool,
        pub total_committed: f64,
        pub total_actual: f64,
        pub total_shortfall: f64,
        pub checkins: Vec<CheckinView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CommitmentDetailResponse {
        pub company: String,
        pub commitment: CommitmentDetail,
    }
}
