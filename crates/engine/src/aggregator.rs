//! The spend aggregator capability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Money, ResultEngine};

/// Answers "how much did `company` spend on `service` between two instants".
///
/// The interval is half-open: `[period_start, period_end)`. Implementations
/// return [`Money::ZERO`] when no records match and an error when the
/// underlying store cannot be queried. Each call is an independent read; an
/// implementation that needs point-in-time consistency across calls must
/// provide it itself.
#[async_trait]
pub trait SpendAggregator: Send + Sync {
    /// Fails when the aggregator has no backing data source.
    ///
    /// Checked once per evaluation, before any check-in is looked at.
    fn ensure_configured(&self) -> ResultEngine<()> {
        Ok(())
    }

    async fn total_spend(
        &self,
        company: &str,
        service: &str,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> ResultEngine<Money>;
}
