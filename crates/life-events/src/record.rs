//! Persisted Agent Records
//!
//! The serialized shape an agent round-trips through storage.
//!
//! Records are deliberately loose: state axes are a name-keyed map, labels are
//! plain strings, and most fields default when absent, so older files still
//! parse. Interpreting and migrating them is the engine's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A persisted agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    #[serde(alias = "animal_id")]
    pub agent_id: String,
    /// Unix seconds at birth
    #[serde(default)]
    pub created_at: f64,
    #[serde(default)]
    pub age_ticks: u64,
    #[serde(default)]
    pub phase: String,
    /// Internal state axes keyed by name
    #[serde(default)]
    pub state: BTreeMap<String, f64>,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub last_expression_tick: i64,
    #[serde(default, alias = "rng_seed")]
    pub seed: u64,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub temperament: Vec<String>,
    #[serde(default)]
    pub encounters: BTreeMap<String, EncounterRecord>,
    #[serde(default)]
    pub silent_until_tick: u64,
    #[serde(default)]
    pub missing_until_tick: u64,
    #[serde(default)]
    pub memory: Vec<MemoryRecord>,
    /// Sequence for the next memory id. Absent in older records.
    #[serde(default)]
    pub next_memory_seq: Option<u64>,
    #[serde(default)]
    pub timeline: Vec<ExpressionRecord>,
}

fn default_tolerance() -> f64 {
    0.52
}

/// Familiarity with one peer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub score: f64,
    #[serde(default)]
    pub last_tick: u64,
}

/// One remembered fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(alias = "memory_id")]
    pub id: String,
    pub text: String,
    pub weight: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub created_tick: u64,
    #[serde(alias = "last_tick", default)]
    pub last_reinforced_tick: u64,
    #[serde(default)]
    pub usage_count: u32,
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    #[serde(alias = "tick")]
    pub origination_tick: u64,
    pub sentences: Vec<String>,
    /// Absent in old records; readers fall back to the origination tick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_tick: Option<u64>,
}

impl ExpressionRecord {
    pub fn visible_at(&self) -> u64 {
        self.public_tick.unwrap_or(self.origination_tick)
    }
}
