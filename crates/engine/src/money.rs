use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{EngineError, ResultEngine};

/// Number of fractional digits every [`Money`] carries.
pub const MONEY_SCALE: u32 = 2;

/// Signed money amount with exactly two fractional digits.
///
/// Use this type for **all** monetary values in the engine (committed
/// amounts, actual spend, shortfalls and totals). Arithmetic stays in base 10
/// so repeated sums never drift the way binary floats do.
///
/// Any wider-precision input is quantized to the nearest cent with
/// **round-half-even** (banker's rounding): `0.125` becomes `0.12`, `0.135`
/// becomes `0.14`. The rule is applied everywhere a value enters the engine
/// (catalog amounts, billing rows, aggregator results).
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount: Money = "12.345".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(Money::from_minor(1050).to_string(), "10.50");
/// ```
///
/// Shortfall and surplus are a subtraction floored at zero:
///
/// ```rust
/// use engine::Money;
///
/// let committed = Money::from_minor(100_000);
/// let actual = Money::from_minor(90_000);
/// assert_eq!((committed - actual).max(Money::ZERO).to_string(), "100.00");
/// assert_eq!((actual - committed).max(Money::ZERO), Money::ZERO);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Quantizes `value` to two fractional digits (round-half-even).
    ///
    /// Fails when the amount does not fit in `i64` minor units, the range the
    /// billing store can hold.
    pub fn new(value: Decimal) -> ResultEngine<Self> {
        let mut quantized =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        quantized.rescale(MONEY_SCALE);
        let money = Self(quantized);
        money.to_minor()?;
        Ok(money)
    }

    /// Builds an amount from integer minor units (cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, MONEY_SCALE))
    }

    /// Returns the amount in minor units (cents).
    pub fn to_minor(self) -> ResultEngine<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .ok_or_else(|| EngineError::InvalidAmount(format!("{self} is out of range")))
    }

    /// Floating point approximation for serialization boundaries only.
    ///
    /// The value is already quantized, so the nearest `f64` round-trips to
    /// the same two-digit string.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition.
    ///
    /// Returns `None` when the exact sum cannot keep two fractional digits.
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0
            .checked_add(rhs.0)
            .filter(|sum| sum.scale() == MONEY_SCALE)
            .map(Money)
    }

    /// Checked subtraction, with the same contract as [`Money::checked_add`].
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0
            .checked_sub(rhs.0)
            .filter(|difference| difference.scale() == MONEY_SCALE)
            .map(Money)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string and quantizes it to cents.
    ///
    /// Accepts an optional leading sign, any number of fractional digits and
    /// scientific notation (`1e3`), which is what JSON numbers may look like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let value = if unsigned.contains(['e', 'E']) {
            Decimal::from_scientific(unsigned)
        } else {
            Decimal::from_str(unsigned)
        }
        .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {trimmed}")))?;

        Money::new(value)
    }
}
