//! Value objects for the order domain.

use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
///
/// Serialized as the bare number of cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = €10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a whole euro value.
    pub const fn from_euros(euros: i64) -> Self {
        Self { cents: euros * 100 }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the euro portion (whole number).
    pub fn euros(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after euros).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * i64::from(quantity),
        }
    }

    /// Divides into `ways` equal shares, rounding half away from zero to
    /// the nearest cent.
    ///
    /// Returns `None` when `ways` is zero.
    pub fn split(&self, ways: u32) -> Option<Money> {
        if ways == 0 {
            return None;
        }
        let ways = i64::from(ways);
        let magnitude = (self.cents.abs() * 2 + ways) / (ways * 2);
        Some(Money {
            cents: magnitude * self.cents.signum(),
        })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-€{}.{:02}", self.euros().abs(), self.cents_part())
        } else {
            write!(f, "€{}.{:02}", self.euros(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents - rhs.cents,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.cents -= rhs.cents;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let money = Money::from_cents(1234);
        assert_eq!(money.cents(), 1234);
        assert_eq!(money.euros(), 12);
        assert_eq!(money.cents_part(), 34);
    }

    #[test]
    fn test_money_from_euros() {
        let money = Money::from_euros(50);
        assert_eq!(money.cents(), 5000);
        assert_eq!(money.cents_part(), 0);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "€12.34");
        assert_eq!(Money::from_cents(100).to_string(), "€1.00");
        assert_eq!(Money::from_cents(5).to_string(), "€0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-€12.34");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply(3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(200);
        assert_eq!(c.cents(), 1300);
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 355);
    }

    #[test]
    fn test_split_rounds_to_nearest_cent() {
        assert_eq!(Money::from_cents(2700).split(2), Some(Money::from_cents(1350)));
        assert_eq!(Money::from_cents(1000).split(3), Some(Money::from_cents(333)));
        assert_eq!(Money::from_cents(2000).split(3), Some(Money::from_cents(667)));
        assert_eq!(Money::from_cents(5).split(2), Some(Money::from_cents(3)));
        assert_eq!(Money::from_cents(1000).split(0), None);
    }

    #[test]
    fn test_split_shares_cover_total_within_rounding() {
        let total = Money::from_cents(12_345);
        for ways in 1..=12u32 {
            let share = total.split(ways).unwrap();
            let diff = (share.multiply(ways) - total).cents().abs();
            assert!(diff <= i64::from(ways) / 2 + 1, "ways={ways} diff={diff}");
        }
    }

    #[test]
    fn test_money_serializes_as_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1250)).unwrap(), "1250");
        let money: Money = serde_json::from_str("-75").unwrap();
        assert_eq!(money.cents(), -75);
    }

    #[test]
    fn test_money_comparison() {
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(0).is_zero());
        assert!(Money::from_cents(-100).is_negative());
    }
}
