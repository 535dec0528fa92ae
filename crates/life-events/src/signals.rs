//! World Signals
//!
//! The ambient, non-social inputs every agent receives for a tick.

use serde::{Deserialize, Serialize};

/// Shared ambient signals for one logical tick.
///
/// Produced by the world stream and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSignals {
    /// Tick these signals were produced for
    pub tick: u64,
    /// Logical seconds elapsed since tick 0
    pub time_elapsed: f64,
    /// Daily cycle, -1.0 to 1.0
    pub circadian: f64,
    /// Yearly cycle, -1.0 to 1.0
    pub seasonality: f64,
    /// 0.2 to 1.0
    pub light_level: f64,
    /// Never negative
    pub environmental_noise: f64,
    /// General-purpose scalar in [0, 1)
    pub randomness: f64,
}

impl WorldSignals {
    /// A quiet midday signal, handy for tests and tooling.
    pub fn calm(tick: u64) -> Self {
        Self {
            tick,
            time_elapsed: 0.0,
            circadian: 0.0,
            seasonality: 0.0,
            light_level: 0.6,
            environmental_noise: 0.3,
            randomness: 0.5,
        }
    }
}
