//! Fortune module
//!
//! A fortune teller hands out whatever her oracle friend answers, provided
//! enough money was spent. Below the threshold she answers nothing.

mod oracle;
mod teller;

pub use oracle::{FixedOracle, Oracle};
pub use teller::{FortuneError, FortuneTeller, DEFAULT_MONEY, THRESHOLD};
