use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{commitments, companies, health};
use engine::{CommitmentCatalog, DbSpendAggregator, Evaluator};

#[derive(Clone)]
pub struct ServerState {
    pub evaluator: Arc<Evaluator>,
    pub catalog: Arc<dyn CommitmentCatalog>,
    /// `None` when no billing database url is configured.
    pub db: Option<DatabaseConnection>,
}

impl ServerState {
    /// Wires the evaluator to the billing store, or to an unconfigured
    /// aggregator when `db` is `None`.
    pub fn new(catalog: Arc<dyn CommitmentCatalog>, db: Option<DatabaseConnection>) -> Self {
        let aggregator = match &db {
            Some(db) => DbSpendAggregator::new(db.clone()),
            None => DbSpendAggregator::unconfigured(),
        };
        let evaluator = Evaluator::builder().aggregator(Arc::new(aggregator)).build();

        Self {
            evaluator: Arc::new(evaluator),
            catalog,
            db,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health::get))
        .route("/api/companies", get(companies::list))
        .route(
            "/api/companies/{company}/commitments",
            get(commitments::list),
        )
        .route(
            "/api/companies/{company}/commitments/{id}",
            get(commitments::detail),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
