//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without recompiling.
//! Every section defaults independently, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use life_events::Phase;

use crate::error::ConfigError;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub phases: PhaseThresholds,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub pressure: PressureConfig,
    #[serde(default)]
    pub actions: ActionWeights,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub encounters: EncounterConfig,
    #[serde(default)]
    pub public: PublicConfig,
    #[serde(default)]
    pub rare_events: RareEventConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Ambient signal generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Logical seconds per tick
    pub tick_seconds: f64,
    pub noise_mean: f64,
    pub noise_std_dev: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 60.0,
            noise_mean: 0.35,
            noise_std_dev: 0.15,
        }
    }
}

/// Age thresholds for each life phase (infancy starts at 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    pub juvenile: u64,
    pub mature: u64,
    pub elder: u64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            juvenile: 500,
            mature: 2500,
            elder: 7000,
        }
    }
}

impl PhaseThresholds {
    pub fn phase_for(&self, age_ticks: u64) -> Phase {
        Phase::from_age(age_ticks, self.juvenile, self.mature, self.elder)
    }
}

/// Per-axis drift magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDrift {
    pub arousal: f64,
    pub curiosity: f64,
    pub fatigue: f64,
    pub social_tolerance: f64,
}

impl Default for StateDrift {
    fn default() -> Self {
        Self {
            arousal: 0.003,
            curiosity: 0.004,
            fatigue: 0.003,
            social_tolerance: 0.002,
        }
    }
}

/// Internal state vector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub initial_min: f64,
    pub initial_max: f64,
    pub drift: StateDrift,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            initial_min: 0.25,
            initial_max: 0.75,
            drift: StateDrift::default(),
        }
    }
}

/// Expression urge and threshold parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    pub base_growth: f64,
    /// Multiplier on the bounded drive-vs-inhibition term
    pub state_weight: f64,
    pub conflict_weight: f64,
    pub max: f64,
    /// Pressure never drops below this after an expression
    pub floor: f64,
    pub expression_decrement: f64,
    pub initial_min: f64,
    pub initial_max: f64,
    pub tolerance_base: f64,
    pub tolerance_variance: f64,
    pub tolerance_min: f64,
    pub tolerance_max: f64,
    /// Minimum ticks between two expressions
    pub cooldown_ticks: u64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            base_growth: 0.006,
            state_weight: 1.0,
            conflict_weight: 0.05,
            max: 1.2,
            floor: 0.1,
            expression_decrement: 0.4,
            initial_min: 0.05,
            initial_max: 0.25,
            tolerance_base: 0.52,
            tolerance_variance: 0.18,
            tolerance_min: 0.35,
            tolerance_max: 0.95,
            cooldown_ticks: 8,
        }
    }
}

/// Per-tick action selection probabilities (must sum to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionWeights {
    pub silent: f64,
    pub observe: f64,
    pub internal: f64,
    pub express: f64,
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            silent: 0.35,
            observe: 0.30,
            internal: 0.15,
            express: 0.20,
        }
    }
}

impl ActionWeights {
    pub fn total(&self) -> f64 {
        self.silent + self.observe + self.internal + self.express
    }
}

/// Memory system parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub decay_rate: f64,
    /// Memories lighter than this are forgotten
    pub min_weight: f64,
    pub base_weight: f64,
    pub early_bonus_ticks: u64,
    pub early_bonus_multiplier: f64,
    pub reinforce_boost: f64,
    /// Valence magnitude that counts as a strong feeling
    pub conflict_valence: f64,
    pub conflict_divisor: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.002,
            min_weight: 0.05,
            base_weight: 0.4,
            early_bonus_ticks: 500,
            early_bonus_multiplier: 1.3,
            reinforce_boost: 0.12,
            conflict_valence: 0.35,
            conflict_divisor: 4.0,
        }
    }
}

/// Peer familiarity parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Multiplicative decay per tick
    pub decay: f64,
    pub boost: f64,
    /// Encounters below this score are dropped
    pub floor: f64,
    /// Score assumed for a peer never met
    pub default_score: f64,
    pub min_pick_weight: f64,
    /// Chance an observed post becomes a memory
    pub memory_chance: f64,
    pub shy_threshold: f64,
    pub shy_skip_chance: f64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            decay: 0.995,
            boost: 0.08,
            floor: 0.02,
            default_score: 0.1,
            min_pick_weight: 0.05,
            memory_chance: 0.45,
            shy_threshold: 0.25,
            shy_skip_chance: 0.6,
        }
    }
}

/// Time distortion of the public feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicConfig {
    pub delay_min: i64,
    pub delay_max: i64,
    pub backdate_chance: f64,
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            delay_min: -3,
            delay_max: 12,
            backdate_chance: 0.18,
        }
    }
}

/// Rare event roll and its cumulative partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RareEventConfig {
    pub chance: f64,
    pub silence: f64,
    pub shift: f64,
    pub mutation: f64,
    pub disappear: f64,
    pub silence_min_ticks: u64,
    pub silence_max_ticks: u64,
    pub missing_min_ticks: u64,
    pub missing_max_ticks: u64,
}

impl Default for RareEventConfig {
    fn default() -> Self {
        Self {
            chance: 0.0025,
            silence: 0.25,
            shift: 0.25,
            mutation: 0.25,
            disappear: 0.20,
            silence_min_ticks: 12,
            silence_max_ticks: 80,
            missing_min_ticks: 20,
            missing_max_ticks: 120,
        }
    }
}

/// Scheduler parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub archive_interval_ticks: u64,
    /// Peer posts handed to each agent per tick
    pub feed_limit: usize,
    /// Fraction of the population ticked each round
    pub tick_fraction: f64,
    pub birth_chance: f64,
    pub population_target: usize,
    pub births_per_run: usize,
    pub worker_threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            archive_interval_ticks: 1200,
            feed_limit: 10,
            tick_fraction: 1.0,
            birth_chance: 0.01,
            population_target: 100,
            births_per_run: 3,
            worker_threads: 1,
        }
    }
}

impl Tuning {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a path, or use defaults if the file does not exist.
    ///
    /// A file that exists but is malformed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("No tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject out-of-range or inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        check(w.tick_seconds > 0.0, "world.tick_seconds", "must be positive")?;
        check(
            w.noise_std_dev.is_finite() && w.noise_std_dev >= 0.0,
            "world.noise_std_dev",
            "must be finite and non-negative",
        )?;
        check(w.noise_mean.is_finite(), "world.noise_mean", "must be finite")?;

        let p = &self.phases;
        check(
            p.juvenile <= p.mature && p.mature <= p.elder,
            "phases",
            "thresholds must be non-decreasing",
        )?;

        let s = &self.state;
        check(
            0.0 <= s.initial_min && s.initial_min <= s.initial_max && s.initial_max <= 1.0,
            "state.initial_min",
            "initial range must lie within [0, 1]",
        )?;
        for (name, drift) in [
            ("state.drift.arousal", s.drift.arousal),
            ("state.drift.curiosity", s.drift.curiosity),
            ("state.drift.fatigue", s.drift.fatigue),
            ("state.drift.social_tolerance", s.drift.social_tolerance),
        ] {
            check((0.0..=1.0).contains(&drift), name, "must be within [0, 1]")?;
        }

        let pr = &self.pressure;
        check(
            0.0 <= pr.floor && pr.floor <= pr.max,
            "pressure.floor",
            "must be within [0, pressure.max]",
        )?;
        check(pr.state_weight >= 0.0, "pressure.state_weight", "must be non-negative")?;
        check(pr.conflict_weight >= 0.0, "pressure.conflict_weight", "must be non-negative")?;
        check(
            pr.expression_decrement >= 0.0,
            "pressure.expression_decrement",
            "must be non-negative",
        )?;
        check(
            0.0 <= pr.initial_min && pr.initial_min <= pr.initial_max && pr.initial_max <= pr.max,
            "pressure.initial_min",
            "initial range must lie within [0, pressure.max]",
        )?;
        check(
            0.0 <= pr.tolerance_min && pr.tolerance_min <= pr.tolerance_max,
            "pressure.tolerance_min",
            "tolerance bounds are inverted",
        )?;
        check(
            pr.tolerance_variance >= 0.0,
            "pressure.tolerance_variance",
            "must be non-negative",
        )?;

        let a = &self.actions;
        for (name, weight) in [
            ("actions.silent", a.silent),
            ("actions.observe", a.observe),
            ("actions.internal", a.internal),
            ("actions.express", a.express),
        ] {
            check_probability(name, weight)?;
        }
        check(
            (a.total() - 1.0).abs() < 1e-6,
            "actions",
            "weights must sum to 1",
        )?;

        let m = &self.memory;
        check(m.decay_rate >= 0.0, "memory.decay_rate", "must be non-negative")?;
        check_probability("memory.min_weight", m.min_weight)?;
        check_probability("memory.base_weight", m.base_weight)?;
        check(
            m.early_bonus_multiplier >= 0.0,
            "memory.early_bonus_multiplier",
            "must be non-negative",
        )?;
        check(m.reinforce_boost >= 0.0, "memory.reinforce_boost", "must be non-negative")?;
        check(m.conflict_divisor > 0.0, "memory.conflict_divisor", "must be positive")?;

        let e = &self.encounters;
        check_probability("encounters.decay", e.decay)?;
        check_probability("encounters.boost", e.boost)?;
        check_probability("encounters.floor", e.floor)?;
        check_probability("encounters.default_score", e.default_score)?;
        check(e.min_pick_weight > 0.0, "encounters.min_pick_weight", "must be positive")?;
        check_probability("encounters.memory_chance", e.memory_chance)?;
        check_probability("encounters.shy_skip_chance", e.shy_skip_chance)?;

        let pb = &self.public;
        check(
            pb.delay_min <= pb.delay_max,
            "public.delay_min",
            "must not exceed public.delay_max",
        )?;
        check_probability("public.backdate_chance", pb.backdate_chance)?;

        let r = &self.rare_events;
        check_probability("rare_events.chance", r.chance)?;
        for (name, share) in [
            ("rare_events.silence", r.silence),
            ("rare_events.shift", r.shift),
            ("rare_events.mutation", r.mutation),
            ("rare_events.disappear", r.disappear),
        ] {
            check_probability(name, share)?;
        }
        check(
            r.silence + r.shift + r.mutation + r.disappear <= 1.0 + 1e-6,
            "rare_events",
            "partition must not exceed 1",
        )?;
        check(
            r.silence_min_ticks <= r.silence_max_ticks,
            "rare_events.silence_min_ticks",
            "silence span is inverted",
        )?;
        check(
            r.missing_min_ticks <= r.missing_max_ticks,
            "rare_events.missing_min_ticks",
            "missing span is inverted",
        )?;

        let sim = &self.simulation;
        check(
            sim.archive_interval_ticks > 0,
            "simulation.archive_interval_ticks",
            "must be positive",
        )?;
        check(
            sim.tick_fraction > 0.0 && sim.tick_fraction <= 1.0,
            "simulation.tick_fraction",
            "must be within (0, 1]",
        )?;
        check_probability("simulation.birth_chance", sim.birth_chance)?;

        Ok(())
    }
}

fn check(ok: bool, field: &str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        })
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), ConfigError> {
    check((0.0..=1.0).contains(&value), field, "must be within [0, 1]")
}
