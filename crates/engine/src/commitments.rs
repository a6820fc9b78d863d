//! Commitment definitions.
//!
//! A [`Commitment`] is a company's pledge to spend at least a given amount on
//! a service, split into one or more [`CheckIn`] periods. Commitments are
//! read-only: they come from a [`CommitmentCatalog`] and are never mutated or
//! persisted by the engine.
//!
//! [`CommitmentCatalog`]: crate::CommitmentCatalog

use chrono::{DateTime, Utc};

use crate::{EngineError, Money, ResultEngine, util::format_timestamp};

/// Stable identifier of a commitment inside the catalog.
pub type CommitmentId = i64;

/// One time-bounded sub-commitment.
///
/// The period is half-open: `[start, end)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckIn {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub amount: Money,
}

impl CheckIn {
    /// Builds a validated check-in.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, amount: Money) -> ResultEngine<Self> {
        let checkin = Self { start, end, amount };
        checkin.validate()?;
        Ok(checkin)
    }

    /// Checks `start < end` and a non-negative committed amount.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.start >= self.end {
            return Err(EngineError::InvalidData(format!(
                "check-in start {} must be before end {}",
                format_timestamp(self.start),
                format_timestamp(self.end)
            )));
        }
        if self.amount.is_negative() {
            return Err(EngineError::InvalidData(format!(
                "check-in committed amount must be >= 0, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A declared spend agreement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
    pub id: CommitmentId,
    pub name: String,
    pub company: String,
    pub service: String,
    /// Check-ins in declaration order (usually, but not necessarily,
    /// chronological).
    pub checkins: Vec<CheckIn>,
}

impl Commitment {
    /// Validates every check-in, reporting the first offending one.
    pub fn validate(&self) -> ResultEngine<()> {
        for (index, checkin) in self.checkins.iter().enumerate() {
            checkin.validate().map_err(|err| match err {
                EngineError::InvalidData(msg) => EngineError::InvalidData(format!(
                    "commitment {} check-in #{index}: {msg}",
                    self.id
                )),
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn new_checkin_accepts_ordered_period() {
        let checkin = CheckIn::new(jan(1), jan(31), Money::from_minor(100_000)).unwrap();
        assert_eq!(checkin.amount.to_string(), "1000.00");
    }

    #[test]
    #[should_panic(expected = "InvalidData")]
    fn new_checkin_rejects_empty_period() {
        CheckIn::new(jan(1), jan(1), Money::ZERO).unwrap();
    }

    #[test]
    fn validate_names_offending_checkin() {
        let commitment = Commitment {
            id: 9,
            name: "S3 commitment".to_string(),
            company: "cyberdyne".to_string(),
            service: "s3".to_string(),
            checkins: vec![
                CheckIn {
                    start: jan(1),
                    end: jan(10),
                    amount: Money::ZERO,
                },
                CheckIn {
                    start: jan(20),
                    end: jan(10),
                    amount: Money::ZERO,
                },
            ],
        };

        let err = commitment.validate().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidData(
                "commitment 9 check-in #1: check-in start 2024-01-20 00:00:00 must be before end 2024-01-10 00:00:00"
                    .to_string()
            )
        );
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let checkin = CheckIn {
            start: jan(1),
            end: jan(2),
            amount: Money::from_minor(-1),
        };
        assert!(matches!(
            checkin.validate(),
            Err(EngineError::InvalidData(_))
        ));
    }
}
