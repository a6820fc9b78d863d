//! Health API endpoint

use api_types::health::HealthResponse;
use axum::{Json, extract::State};

use crate::server::ServerState;

/// Reports liveness and whether the billing database answers.
pub async fn get(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database_reachable = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("billing database ping failed: {err}");
                false
            }
        },
        None => false,
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        service: "commitments".to_string(),
        database_url_configured: state.db.is_some(),
        database_reachable,
    })
}
