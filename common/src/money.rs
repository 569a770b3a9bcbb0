use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A monetary amount, always normalized to two fractional digits.
///
/// Wraps `rust_decimal::Decimal` rather than a float so that arithmetic across
/// credits/debits never drifts away from an exact cent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("amount must be strictly positive")]
    NotPositive,
    #[error("currency code must be a 3-letter ISO code, got '{0}'")]
    InvalidCurrencyCode(String),
}

impl Money {
    /// Builds a `Money` value, rejecting non-positive amounts.
    ///
    /// Every LO/BA operation in the contract requires a strictly positive
    /// amount; callers that need zero (e.g. a freshly created account's
    /// initial balance) use [`Money::zero`] instead.
    pub fn positive(amount: Decimal) -> Result<Self, CurrencyError> {
        if amount <= Decimal::ZERO {
            return Err(CurrencyError::NotPositive);
        }
        Ok(Self(amount.round_dp(2)))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_existing(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn checked_add(&self, other: Money) -> Self {
        Self((self.0 + other.0).round_dp(2))
    }

    pub fn checked_sub(&self, other: Money) -> Option<Self> {
        let result = self.0 - other.0;
        if result < Decimal::ZERO {
            None
        } else {
            Some(Self(result.round_dp(2)))
        }
    }

    pub fn is_sufficient_for(&self, amount: Money) -> bool {
        self.0 >= amount.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self::from_existing)
    }
}

/// A three-letter uppercase ISO-4217-shaped currency code.
///
/// The contract names a single system currency; this type exists so the
/// "currency is implicitly the single system currency" rule is enforced at
/// construction rather than scattered across call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let upper = code.to_uppercase();
        if upper.len() == 3 && upper.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(upper))
        } else {
            Err(CurrencyError::InvalidCurrencyCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(matches!(
            Money::positive(Decimal::ZERO),
            Err(CurrencyError::NotPositive)
        ));
        assert!(matches!(
            Money::positive(Decimal::new(-100, 2)),
            Err(CurrencyError::NotPositive)
        ));
    }

    #[test]
    fn rounds_to_two_fractional_digits() {
        let m = Money::positive(Decimal::new(150755, 3)).unwrap(); // 150.755
        assert_eq!(m.to_string(), "150.76");
    }

    #[test]
    fn checked_sub_refuses_to_go_negative() {
        let balance = Money::from_existing(Decimal::new(1000, 2)); // 10.00
        let too_much = Money::positive(Decimal::new(5000, 2)).unwrap(); // 50.00
        assert!(balance.checked_sub(too_much).is_none());
    }

    #[test]
    fn currency_must_be_three_letters() {
        assert!(Currency::parse("usd").is_ok());
        assert!(Currency::parse("US").is_err());
        assert!(Currency::parse("USDD").is_err());
    }
}
