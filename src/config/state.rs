// Application state module
// Shared between all connections of the application server

use std::sync::atomic::{AtomicU64, Ordering};

use super::types::Config;
use crate::fortune::{FixedOracle, FortuneTeller};

/// Application state
pub struct AppState {
    pub config: Config,

    /// Fortune teller behind `/fortune`, oracle chosen from config
    pub fortune_teller: FortuneTeller<FixedOracle>,

    /// Whether connections and requests are access logged
    pub access_log: bool,

    /// Number of answers rendered so far
    answers_served: AtomicU64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let fortune_teller = if config.oracle.enabled {
            FortuneTeller::new(FixedOracle::new(config.oracle.answer.clone()))
        } else {
            FortuneTeller::without_oracle()
        };

        Self {
            config: config.clone(),
            fortune_teller,
            access_log: config.logging.access_log,
            answers_served: AtomicU64::new(0),
        }
    }

    /// Allocate the id of the next rendered answer (starting at 1)
    pub fn next_answer_id(&self) -> u64 {
        self.answers_served.fetch_add(1, Ordering::Relaxed) + 1
    }
}
