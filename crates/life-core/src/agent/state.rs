//! Internal State
//!
//! The named state axes of an agent and its per-peer encounter records.
//! All axis values are 0.0 to 1.0 and every setter clamps.

use std::collections::BTreeMap;

use crate::config::StateDrift;

/// One internal state axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Arousal,
    Curiosity,
    Fatigue,
    SocialTolerance,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Arousal,
        Axis::Curiosity,
        Axis::Fatigue,
        Axis::SocialTolerance,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Axis::Arousal => "arousal",
            Axis::Curiosity => "curiosity",
            Axis::Fatigue => "fatigue",
            Axis::SocialTolerance => "social_tolerance",
        }
    }

    /// Axis names older records used for the same drive
    fn legacy_keys(self) -> &'static [&'static str] {
        match self {
            Axis::Arousal => &["energy"],
            Axis::Curiosity => &[],
            Axis::Fatigue => &["stress"],
            Axis::SocialTolerance => &["comfort"],
        }
    }

    pub fn drift(self, drift: &StateDrift) -> f64 {
        match self {
            Axis::Arousal => drift.arousal,
            Axis::Curiosity => drift.curiosity,
            Axis::Fatigue => drift.fatigue,
            Axis::SocialTolerance => drift.social_tolerance,
        }
    }
}

/// Value assumed for an axis a record does not carry
pub const DEFAULT_AXIS_VALUE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    arousal: f64,
    curiosity: f64,
    fatigue: f64,
    social_tolerance: f64,
}

impl Default for StateVector {
    fn default() -> Self {
        Self::uniform(DEFAULT_AXIS_VALUE)
    }
}

impl StateVector {
    pub fn uniform(value: f64) -> Self {
        let value = clamp_unit(value);
        Self {
            arousal: value,
            curiosity: value,
            fatigue: value,
            social_tolerance: value,
        }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Arousal => self.arousal,
            Axis::Curiosity => self.curiosity,
            Axis::Fatigue => self.fatigue,
            Axis::SocialTolerance => self.social_tolerance,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        let value = clamp_unit(value);
        match axis {
            Axis::Arousal => self.arousal = value,
            Axis::Curiosity => self.curiosity = value,
            Axis::Fatigue => self.fatigue = value,
            Axis::SocialTolerance => self.social_tolerance = value,
        }
    }

    pub fn nudge(&mut self, axis: Axis, delta: f64) {
        self.set(axis, self.get(axis) + delta);
    }

    pub fn arousal(&self) -> f64 {
        self.arousal
    }

    pub fn curiosity(&self) -> f64 {
        self.curiosity
    }

    pub fn fatigue(&self) -> f64 {
        self.fatigue
    }

    pub fn social_tolerance(&self) -> f64 {
        self.social_tolerance
    }

    /// Bounded [0, 1] urge to speak: drive (arousal, curiosity) against
    /// inhibition (fatigue, low social tolerance).
    pub fn drive_balance(&self) -> f64 {
        let drive = self.arousal + self.curiosity;
        let inhibition = self.fatigue + (1.0 - self.social_tolerance);
        ((drive - inhibition + 1.0) / 3.0).clamp(0.0, 1.0)
    }

    pub fn to_axes(&self) -> BTreeMap<String, f64> {
        Axis::ALL
            .into_iter()
            .map(|axis| (axis.key().to_string(), self.get(axis)))
            .collect()
    }

    /// Build from a name-keyed map, remapping legacy axis names and defaulting
    /// anything missing. Returns the vector and the axes that were defaulted.
    pub fn from_axes(axes: &BTreeMap<String, f64>) -> (Self, Vec<Axis>) {
        let mut state = Self::default();
        let mut defaulted = Vec::new();
        for axis in Axis::ALL {
            let value = std::iter::once(axis.key())
                .chain(axis.legacy_keys().iter().copied())
                .find_map(|key| axes.get(key).copied())
                .filter(|v| v.is_finite());
            match value {
                Some(v) => state.set(axis, v),
                None => defaulted.push(axis),
            }
        }
        (state, defaulted)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_AXIS_VALUE
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Familiarity with one peer, built through observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encounter {
    /// 0.0 to 1.0
    pub score: f64,
    pub last_tick: u64,
}
