//! Money in integer minor units.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A non-negative amount in the smallest currency unit (e.g. cents).
///
/// All arithmetic is checked; prices never go through floating point.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::validation("amount overflow"))
    }

    pub fn checked_mul(self, factor: u32) -> DomainResult<Money> {
        self.0
            .checked_mul(u64::from(factor))
            .map(Money)
            .ok_or_else(|| DomainError::validation("amount overflow"))
    }
}

/// Renders as `major.minor` with two decimal places (`2990` → `29.90`).
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_minor_units() {
        assert_eq!(Money::from_cents(2990).to_string(), "29.90");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn checked_mul_detects_overflow() {
        assert_eq!(
            Money::from_cents(2800).checked_mul(2).unwrap(),
            Money::from_cents(5600)
        );
        assert!(Money::from_cents(u64::MAX).checked_mul(2).is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(150)).unwrap();
        assert_eq!(json, "150");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: repeated addition agrees with multiplication (no drift).
            #[test]
            fn repeated_add_equals_mul(cents in 0u64..1_000_000, times in 1u32..500) {
                let mut acc = Money::ZERO;
                for _ in 0..times {
                    acc = acc.checked_add(Money::from_cents(cents)).unwrap();
                }
                prop_assert_eq!(acc, Money::from_cents(cents).checked_mul(times).unwrap());
            }
        }
    }
}
