use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

pub const COPPER_PER_SILVER: i64 = 100;
pub const COPPER_PER_GOLD: i64 = COPPER_PER_SILVER * 100;

const SILVER_U64: u64 = COPPER_PER_SILVER.unsigned_abs();
const GOLD_U64: u64 = COPPER_PER_GOLD.unsigned_abs();

/// A signed amount of in-game currency, stored in copper.
///
/// Arithmetic saturates at the `i64` bounds instead of wrapping, so absurd
/// manual entries degrade to a clamped value rather than a panic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coins(i64);

impl Coins {
    pub const ZERO: Self = Self(0);

    pub const fn from_copper(copper: i64) -> Self {
        Self(copper)
    }

    /// Combine the three denominations into a copper total.
    ///
    /// Components are taken as entered: negative or out-of-range silver and
    /// copper values are not normalized.
    pub fn from_gsc(gold: i64, silver: i64, copper: i64) -> Self {
        Self(
            gold.saturating_mul(COPPER_PER_GOLD)
                .saturating_add(silver.saturating_mul(COPPER_PER_SILVER))
                .saturating_add(copper),
        )
    }

    pub const fn copper(self) -> i64 {
        self.0
    }

    pub const fn is_sign_negative(self) -> bool {
        self.0 < 0
    }

    /// Gold/silver/copper breakdown of the absolute value.
    pub fn magnitude(self) -> Gsc {
        Gsc::from_copper(self.0.unsigned_abs())
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sign_negative() {
            f.write_str("-")?;
        }
        self.magnitude().fmt(f)
    }
}

impl From<Coins> for i64 {
    fn from(c: Coins) -> Self {
        c.0
    }
}

impl Add<Coins> for Coins {
    type Output = Coins;

    fn add(self, rhs: Coins) -> Coins {
        Coins(self.0.saturating_add(rhs.0))
    }
}

impl Sub<Coins> for Coins {
    type Output = Coins;

    fn sub(self, rhs: Coins) -> Coins {
        Coins(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign<Coins> for Coins {
    fn add_assign(&mut self, rhs: Coins) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign<Coins> for Coins {
    fn sub_assign(&mut self, rhs: Coins) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Mul<u32> for Coins {
    type Output = Coins;

    fn mul(self, quantity: u32) -> Coins {
        Coins(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Neg for Coins {
    type Output = Coins;

    fn neg(self) -> Coins {
        Coins(self.0.saturating_neg())
    }
}

/// Unsigned gold/silver/copper display breakdown.
///
/// Built with floor division by 10 000, then by 100 on the remainder, then
/// the final remainder, so `silver` and `copper` are always below 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gsc {
    pub gold: u64,
    pub silver: u64,
    pub copper: u64,
}

impl Gsc {
    pub const fn from_copper(total: u64) -> Self {
        Self {
            gold: total / GOLD_U64,
            silver: (total % GOLD_U64) / SILVER_U64,
            copper: total % SILVER_U64,
        }
    }
}

impl fmt::Display for Gsc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g {}s {}c", self.gold, self.silver, self.copper)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result};

    use super::*;

    #[test]
    fn test_from_gsc_combines_denominations() {
        assert_eq!(Coins::from_gsc(1, 0, 0).copper(), 10_000);
        assert_eq!(Coins::from_gsc(2, 45, 7).copper(), 24_507);
        assert_eq!(Coins::from_gsc(0, 0, 0), Coins::ZERO);
    }

    #[test]
    fn test_from_gsc_keeps_out_of_range_components() {
        // 150 silver is not renormalized before summing
        assert_eq!(Coins::from_gsc(0, 150, 0).copper(), 15_000);
        assert_eq!(Coins::from_gsc(1, -50, 0).copper(), 5_000);
    }

    #[test]
    fn test_from_gsc_saturates() {
        assert_eq!(Coins::from_gsc(i64::MAX, 0, 0).copper(), i64::MAX);
        assert_eq!(Coins::from_gsc(i64::MIN, 0, -1).copper(), i64::MIN);
    }

    #[test]
    fn test_magnitude_breakdown() {
        let gsc = Coins::from_copper(7_000).magnitude();
        assert_eq!(
            gsc,
            Gsc {
                gold: 0,
                silver: 70,
                copper: 0
            }
        );

        let gsc = Coins::from_copper(-24_500).magnitude();
        assert_eq!(
            gsc,
            Gsc {
                gold: 2,
                silver: 45,
                copper: 0
            }
        );
    }

    #[test]
    fn test_magnitude_of_min_does_not_overflow() {
        let gsc = Coins::from_copper(i64::MIN).magnitude();
        let total =
            u128::from(gsc.gold) * 10_000 + u128::from(gsc.silver) * 100 + u128::from(gsc.copper);
        assert_eq!(total, u128::from(i64::MIN.unsigned_abs()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Coins::from_copper(24_507).to_string(), "2g 45s 7c");
        assert_eq!(Coins::from_copper(-99).to_string(), "-0g 0s 99c");
        assert_eq!(Coins::ZERO.to_string(), "0g 0s 0c");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let a = Coins::from_copper(500);
        let b = Coins::from_copper(800);
        assert_eq!(a - b, Coins::from_copper(-300));
        assert_eq!(a + b, Coins::from_copper(1_300));
        assert_eq!(-a, Coins::from_copper(-500));
        assert_eq!(Coins::from_copper(i64::MAX) + a, Coins::from_copper(i64::MAX));
        assert_eq!(-Coins::from_copper(i64::MIN), Coins::from_copper(i64::MAX));

        assert_eq!(a * 3, Coins::from_copper(1_500));
        assert_eq!(-a * 0, Coins::ZERO);
        assert_eq!(Coins::from_copper(i64::MIN / 2) * 3, Coins::from_copper(i64::MIN));

        let mut c = Coins::ZERO;
        c += a;
        c -= b;
        assert_eq!(c.copper(), -300);
    }

    #[test]
    fn test_coins_serialization_is_transparent() -> Result<()> {
        let c = Coins::from_copper(-4_200);
        let serialized = serde_json::to_string(&c).context("Failed to serialize")?;
        assert_eq!(serialized, "-4200");

        let deserialized: Coins =
            serde_json::from_str(&serialized).context("Failed to deserialize")?;
        assert_eq!(c, deserialized);
        Ok(())
    }
}
