use std::fmt;
use thiserror::Error;

/// Largest multiplier the authority pays out: the 100x jackpot.
pub const JACKPOT_MULTIPLIER: Multiplier = Multiplier { num: 1000, denom: 10 };

#[derive(Debug, Error, PartialEq, Eq)]
#[error("multiplier denominator must be positive")]
pub struct ZeroDenominator;

/// Exact rational payout ratio. Never a float; the denominator is
/// positive by construction.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier {
    num: u64,
    denom: u64,
}

impl Multiplier {
    pub fn new(num: u64, denom: u64) -> Result<Self, ZeroDenominator> {
        if denom == 0 {
            return Err(ZeroDenominator);
        }
        Ok(Self { num, denom })
    }

    pub fn num(&self) -> u64 {
        self.num
    }

    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// Applies the ratio to an amount of minor units, flooring.
    pub fn apply(&self, amount: u64) -> u128 {
        amount as u128 * self.num as u128 / self.denom as u128
    }
}

// Ratio equality, so 2/1 and 20/10 compare equal.
impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.num as u128 * other.denom as u128
            == other.num as u128 * self.denom as u128
    }
}

impl Eq for Multiplier {}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num % self.denom == 0 {
            write!(f, "{}x", self.num / self.denom)
        } else {
            write!(f, "{}/{}x", self.num, self.denom)
        }
    }
}

/// One settled wager, produced exactly once per finalized request and
/// read-only afterward. Amounts are minor units parsed from the
/// decimal-string wire fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub payout: u128,
    pub deposit: u128,
    pub multiplier: Multiplier,
}

impl Settlement {
    pub fn won(&self) -> bool {
        self.payout > 0
    }
}

/// Presentation category of a settlement. Display-only; the authority
/// already moved the tokens.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    LostAll,
    PartialLoss,
    BreakEven,
    Won { jackpot: bool },
}

/// Pure classification of a settlement. The multiplier comes solely
/// from the event's numerator/denominator pair, never from
/// payout/deposit, and comparisons are integer cross-multiplications.
pub fn classify(settlement: &Settlement) -> Outcome {
    if settlement.payout == 0 {
        return Outcome::LostAll;
    }
    let multiplier = settlement.multiplier;
    if multiplier.num() < multiplier.denom() {
        Outcome::PartialLoss
    } else if multiplier.num() == multiplier.denom() {
        Outcome::BreakEven
    } else {
        Outcome::Won {
            jackpot: multiplier == JACKPOT_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier__equality_is_by_ratio() {
        let a = Multiplier::new(20, 10).unwrap();
        let b = Multiplier::new(2, 1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Multiplier::new(3, 1).unwrap());
    }

    #[test]
    fn multiplier__zero_denominator_fails_loudly() {
        assert_eq!(Multiplier::new(10, 0), Err(ZeroDenominator));
    }

    #[test]
    fn multiplier__display_is_integer_only() {
        assert_eq!(Multiplier::new(360, 10).unwrap().to_string(), "36x");
        assert_eq!(Multiplier::new(5, 10).unwrap().to_string(), "5/10x");
    }

    #[test]
    fn apply__floors_the_scaled_amount() {
        let half = Multiplier::new(5, 10).unwrap();
        assert_eq!(half.apply(3), 1);
        assert_eq!(half.apply(1_000_000), 500_000);
    }
}
