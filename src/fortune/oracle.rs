// Oracle capability
// Anything that can produce an answer on demand

use std::sync::Arc;

/// Source of answers consulted by a [`FortuneTeller`](super::FortuneTeller).
///
/// Calls are synchronous and take no input. Implementations decide whether
/// repeated calls return the same text.
pub trait Oracle {
    fn answer(&self) -> String;
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn answer(&self) -> String {
        (**self).answer()
    }
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn answer(&self) -> String {
        (**self).answer()
    }
}

impl<T: Oracle + ?Sized> Oracle for Arc<T> {
    fn answer(&self) -> String {
        (**self).answer()
    }
}

/// Oracle that always gives the same answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOracle {
    text: String,
}

impl FixedOracle {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for FixedOracle {
    /// The answer to life, the universe and everything
    fn default() -> Self {
        Self::new("42")
    }
}

impl Oracle for FixedOracle {
    fn answer(&self) -> String {
        self.text.clone()
    }
}
