//! Commitment evaluation engine.
//!
//! Given a [`Commitment`] (time-bounded check-ins with committed amounts) and
//! a [`SpendAggregator`] able to report actual spend per period, the engine
//! computes per-period and aggregate met/shortfall/surplus results.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), engine::EngineError> {
//! use std::sync::Arc;
//!
//! use chrono::Utc;
//! use engine::{CommitmentCatalog, DbSpendAggregator, Evaluator, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_path("spend_commitments.json")?;
//! let db = sea_orm::Database::connect("sqlite:./billing.db").await?;
//! let evaluator = Evaluator::builder()
//!     .aggregator(Arc::new(DbSpendAggregator::new(db)))
//!     .build();
//!
//! for commitment in catalog.commitments_for_company("cyberdyne")? {
//!     let evaluated = evaluator.evaluate(&commitment, Utc::now()).await?;
//!     println!("{}: met={}", evaluated.name, evaluated.met);
//! }
//! # Ok(())
//! # }
//! ```

pub use aggregator::SpendAggregator;
pub use billing_events::{BillingEvent, insert_billing_events, read_billing_csv};
pub use catalog::{CommitmentCatalog, RejectedCommitment, StaticCatalog};
pub use commitments::{CheckIn, Commitment, CommitmentId};
pub use error::{EngineError, ErrorKind};
pub use evaluation::{
    EvaluatedCheckIn, EvaluatedCommitment, Evaluator, EvaluatorBuilder, evaluate_commitment,
};
pub use money::Money;
pub use period::PeriodStatus;
pub use spend::{DbSpendAggregator, list_companies};
pub use summary::{CommitmentSummary, summarize};
pub use util::{TIMESTAMP_FORMAT, format_timestamp};

mod aggregator;
mod billing_events;
mod catalog;
mod commitments;
mod error;
mod evaluation;
mod money;
mod period;
mod spend;
mod summary;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
