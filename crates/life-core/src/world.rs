//! World Signal Stream
//!
//! Shared, non-social ambient input for every agent: light, noise and the
//! daily and yearly cycles.
//!
//! Signals for a tick depend only on the stream seed and the tick, so agents
//! at the same age always see the same world regardless of the order (or the
//! thread) they are ticked in.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use life_events::WorldSignals;

use crate::config::WorldConfig;

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;
const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_DAY;

/// Deterministic generator of ambient signals.
#[derive(Debug, Clone)]
pub struct WorldSignalStream {
    seed: u64,
    /// Unix seconds the stream was started at
    start_time: u64,
    config: WorldConfig,
}

impl WorldSignalStream {
    pub fn new(seed: u64, start_time: u64, config: WorldConfig) -> Self {
        Self {
            seed,
            start_time,
            config,
        }
    }

    /// Unix seconds a tick corresponds to on this stream's clock.
    pub fn wall_clock_for(&self, tick: u64) -> f64 {
        self.start_time as f64 + tick as f64 * self.config.tick_seconds
    }

    pub fn signals_for_tick(&self, tick: u64) -> WorldSignals {
        let time_elapsed = tick as f64 * self.config.tick_seconds;

        let circadian = (std::f64::consts::TAU * time_elapsed / SECONDS_PER_DAY).sin();
        let seasonality = (std::f64::consts::TAU * time_elapsed / SECONDS_PER_YEAR).sin();
        let light_level = circadian.max(0.0) * 0.8 + 0.2;

        let mut rng = SmallRng::seed_from_u64(mix_seed(self.seed, tick));
        let noise = Normal::new(self.config.noise_mean, self.config.noise_std_dev);
        let environmental_noise = match noise {
            Ok(normal) => normal.sample(&mut rng).max(0.0),
            Err(_) => self.config.noise_mean.max(0.0),
        };
        let randomness = rng.gen::<f64>();

        WorldSignals {
            tick,
            time_elapsed,
            circadian,
            seasonality,
            light_level,
            environmental_noise,
            randomness,
        }
    }
}

/// SplitMix64-style mixing so nearby ticks get unrelated generator states.
fn mix_seed(seed: u64, tick: u64) -> u64 {
    let mut z = seed ^ tick.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
