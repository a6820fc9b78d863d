//! Companies API endpoints

use api_types::company::CompanyListResponse;
use axum::{Json, extract::State};

use crate::server::ServerState;

/// Handle requests for listing companies known to the catalog or billed.
///
/// Billing store failures are not fatal: the catalog companies are still
/// returned.
pub async fn list(State(state): State<ServerState>) -> Json<CompanyListResponse> {
    let mut companies = state.catalog.companies();

    if let Some(db) = &state.db {
        match engine::list_companies(db).await {
            Ok(billed) => companies.extend(billed),
            Err(err) => tracing::warn!("could not list billed companies: {err}"),
        }
    }

    Json(CompanyListResponse {
        companies: companies.into_iter().collect(),
    })
}
