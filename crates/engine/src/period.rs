//! Classification of a check-in period relative to a reference instant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a half-open period `[start, end)` sits relative to "now".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Past,
    Current,
    Future,
}

impl PeriodStatus {
    /// Classifies `[start, end)` against `now`.
    ///
    /// A period is `Past` as soon as `now` reaches `end` (the end is
    /// exclusive) and `Future` only while `now` is strictly before `start`.
    pub fn classify(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if end <= now {
            Self::Past
        } else if start > now {
            Self::Future
        } else {
            Self::Current
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Current => "current",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn now_equal_to_start_is_current() {
        assert_eq!(
            PeriodStatus::classify(at(1, 0), at(10, 0), at(1, 0)),
            PeriodStatus::Current
        );
    }

    #[test]
    fn now_equal_to_end_is_past() {
        assert_eq!(
            PeriodStatus::classify(at(1, 0), at(10, 0), at(10, 0)),
            PeriodStatus::Past
        );
    }

    #[test]
    fn now_inside_is_current() {
        assert_eq!(
            PeriodStatus::classify(at(1, 0), at(10, 0), at(5, 12)),
            PeriodStatus::Current
        );
    }

    #[test]
    fn now_before_start_is_future() {
        assert_eq!(
            PeriodStatus::classify(at(2, 0), at(10, 0), at(1, 23)),
            PeriodStatus::Future
        );
    }

    #[test]
    fn now_after_end_is_past() {
        assert_eq!(
            PeriodStatus::classify(at(1, 0), at(10, 0), at(20, 0)),
            PeriodStatus::Past
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PeriodStatus::Current).unwrap(),
            "\"current\""
        );
        assert_eq!(PeriodStatus::Future.to_string(), "future");
    }
}
