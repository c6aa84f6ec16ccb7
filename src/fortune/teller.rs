// Fortune teller
// Gates access to an oracle's answer behind a spending threshold

use thiserror::Error;

use super::oracle::Oracle;

/// Minimum amount of money (inclusive) that buys an answer
pub const THRESHOLD: f64 = 5.0;

/// Amount assumed when the caller does not say how much was spent
pub const DEFAULT_MONEY: f64 = 0.0;

/// Errors raised while consulting the oracle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FortuneError {
    /// The fortune teller was paid but has no oracle to ask
    #[error("No oracle available to answer")]
    NoOracle,
}

/// Fortune teller answering what her oracle friend answers, or nothing.
///
/// The oracle is fixed at construction and never replaced.
#[derive(Debug, Clone)]
pub struct FortuneTeller<O> {
    oracle: Option<O>,
}

impl<O: Oracle> FortuneTeller<O> {
    pub const fn new(oracle: O) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// A fortune teller nobody introduced to an oracle.
    ///
    /// Unpaid questions still get the empty answer; paid ones fail with
    /// [`FortuneError::NoOracle`].
    pub const fn without_oracle() -> Self {
        Self { oracle: None }
    }

    pub const fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Return the oracle's answer if at least [`THRESHOLD`] was spent,
    /// otherwise the empty string.
    ///
    /// `None` is treated as [`DEFAULT_MONEY`]. Negative and `NaN` amounts are
    /// not rejected; they simply fall below the threshold. The oracle is only
    /// consulted on the paid branch.
    pub fn answer(&self, money: Option<f64>) -> Result<String, FortuneError> {
        if !is_paid(money.unwrap_or(DEFAULT_MONEY)) {
            return Ok(String::new());
        }

        self.oracle
            .as_ref()
            .map(Oracle::answer)
            .ok_or(FortuneError::NoOracle)
    }
}

fn is_paid(money: f64) -> bool {
    money >= THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fortune::FixedOracle;
    use std::cell::Cell;

    /// Oracle that counts how often it was asked
    struct CountingOracle {
        calls: Cell<usize>,
    }

    impl CountingOracle {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Oracle for CountingOracle {
        fn answer(&self) -> String {
            self.calls.set(self.calls.get() + 1);
            "42".to_string()
        }
    }

    #[test]
    fn test_paid_answer_is_oracle_answer() {
        let teller = FortuneTeller::new(FixedOracle::default());
        assert_eq!(teller.answer(Some(5.0)), Ok("42".to_string()));
        assert_eq!(teller.answer(Some(1_000.0)), Ok("42".to_string()));
    }

    #[test]
    fn test_unpaid_answer_is_empty() {
        let teller = FortuneTeller::new(FixedOracle::default());
        assert_eq!(teller.answer(Some(0.0)), Ok(String::new()));
        assert_eq!(teller.answer(Some(4.0)), Ok(String::new()));
    }

    #[test]
    fn test_missing_money_means_zero() {
        let teller = FortuneTeller::new(FixedOracle::default());
        assert_eq!(teller.answer(None), teller.answer(Some(0.0)));
        assert_eq!(teller.answer(None), Ok(String::new()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let teller = FortuneTeller::new(FixedOracle::new("granted"));
        assert_eq!(teller.answer(Some(5.0)), Ok("granted".to_string()));
        assert_eq!(teller.answer(Some(4.999)), Ok(String::new()));
    }

    #[test]
    fn test_oracle_not_consulted_below_threshold() {
        let oracle = CountingOracle::new();
        let teller = FortuneTeller::new(&oracle);

        for money in [-10.0, -0.5, 0.0, 1.0, 4.999, f64::NAN, f64::NEG_INFINITY] {
            assert_eq!(teller.answer(Some(money)), Ok(String::new()));
        }
        assert_eq!(teller.answer(None), Ok(String::new()));
        assert_eq!(oracle.calls.get(), 0);

        assert_eq!(teller.answer(Some(5.0)), Ok("42".to_string()));
        assert_eq!(teller.answer(Some(f64::INFINITY)), Ok("42".to_string()));
        assert_eq!(oracle.calls.get(), 2);
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let teller = FortuneTeller::new(FixedOracle::default());
        let first = teller.answer(Some(7.5));
        let second = teller.answer(Some(7.5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_without_oracle() {
        let teller: FortuneTeller<FixedOracle> = FortuneTeller::without_oracle();
        assert!(!teller.has_oracle());
        assert_eq!(teller.answer(Some(0.0)), Ok(String::new()));
        assert_eq!(teller.answer(None), Ok(String::new()));
        assert_eq!(teller.answer(Some(5.0)), Err(FortuneError::NoOracle));
    }
}
