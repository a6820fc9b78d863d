use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, ErrorKind};

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod commitments;
mod companies;
mod health;
mod server;

pub mod types {
    pub mod health {
        pub use api_types::health::HealthResponse;
    }

    pub mod company {
        pub use api_types::company::CompanyListResponse;
    }

    pub mod commitment {
        pub use api_types::commitment::{
            CheckinStatus, CheckinView, CommitmentDetail, CommitmentDetailResponse,
            CommitmentSummaryView, CompanyCommitmentsResponse,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err.kind() {
        ErrorKind::Configuration | ErrorKind::Transport => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Data => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err.kind() {
        ErrorKind::Configuration | ErrorKind::Transport => {
            tracing::error!("spend source error: {err}");
            "Database unavailable".to_string()
        }
        ErrorKind::Data | ErrorKind::NotFound => err.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_configuration_maps_to_503() {
        let res = ServerError::from(EngineError::Configuration("no db".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn engine_transport_maps_to_503() {
        let res = ServerError::from(EngineError::Unavailable("timeout".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidData("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
