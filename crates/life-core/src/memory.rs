//! Memory System
//!
//! Weighted, decaying memories of text fragments, owned by one agent.
//!
//! Reinforcing text that is already remembered strengthens that memory in place,
//! so a store never holds two memories with the same text.

use life_events::MemoryRecord;

use crate::config::MemoryConfig;

/// A single remembered fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    pub id: String,
    pub text: String,
    /// Salience, 0.0 to 1.0
    pub weight: f64,
    /// Emotional charge, -1.0 to 1.0
    pub valence: f64,
    pub created_tick: u64,
    pub last_reinforced_tick: u64,
    pub usage_count: u32,
}

impl Memory {
    pub fn to_record(&self) -> MemoryRecord {
        MemoryRecord {
            id: self.id.clone(),
            text: self.text.clone(),
            weight: self.weight,
            valence: self.valence,
            created_tick: self.created_tick,
            last_reinforced_tick: self.last_reinforced_tick,
            usage_count: self.usage_count,
        }
    }

    pub fn from_record(record: MemoryRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            weight: sanitize(record.weight, 0.0, 1.0),
            valence: sanitize(record.valence, -1.0, 1.0),
            created_tick: record.created_tick,
            last_reinforced_tick: record.last_reinforced_tick.max(record.created_tick),
            usage_count: record.usage_count,
        }
    }
}

/// All memories of one agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    memories: Vec<Memory>,
    /// Sequence for the next memory id
    next_sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted memories, dropping duplicate texts.
    pub fn from_memories(memories: Vec<Memory>) -> Self {
        let mut store = Self::new();
        for memory in memories {
            if store.find(&memory.text).is_some() {
                continue;
            }
            let sequence = memory
                .id
                .strip_prefix("mem_")
                .and_then(|s| s.parse::<u64>().ok())
                .map_or(0, |n| n + 1);
            store.next_sequence = store.next_sequence.max(sequence);
            store.memories.push(memory);
        }
        store.next_sequence = store.next_sequence.max(store.memories.len() as u64);
        store
    }

    /// Rebuild a store whose id sequence was persisted alongside it. The
    /// sequence never moves below what the live ids imply.
    pub fn restore(memories: Vec<Memory>, next_sequence: u64) -> Self {
        let mut store = Self::from_memories(memories);
        store.next_sequence = store.next_sequence.max(next_sequence);
        store
    }

    /// Sequence the next new memory id is taken from.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn memories(&self) -> &[Memory] {
        &self.memories
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    pub fn find(&self, text: &str) -> Option<&Memory> {
        self.memories.iter().find(|m| m.text == text)
    }

    /// Strengthen an existing memory of `text`, or remember it for the first time.
    pub fn reinforce(
        &mut self,
        text: &str,
        valence: f64,
        tick: u64,
        config: &MemoryConfig,
    ) -> &Memory {
        if let Some(index) = self.memories.iter().position(|m| m.text == text) {
            let memory = &mut self.memories[index];
            memory.weight = (memory.weight + config.reinforce_boost).min(1.0);
            memory.valence = ((memory.valence + valence) / 2.0).clamp(-1.0, 1.0);
            memory.last_reinforced_tick = tick;
            memory.usage_count += 1;
            return &self.memories[index];
        }

        let mut weight = config.base_weight;
        if tick <= config.early_bonus_ticks {
            weight *= config.early_bonus_multiplier;
        }

        let id = format!("mem_{:06}", self.next_sequence);
        self.next_sequence += 1;
        self.memories.push(Memory {
            id,
            text: text.to_string(),
            weight: weight.clamp(0.0, 1.0),
            valence: valence.clamp(-1.0, 1.0),
            created_tick: tick,
            last_reinforced_tick: tick,
            usage_count: 0,
        });
        let last = self.memories.len() - 1;
        &self.memories[last]
    }

    /// Fade every memory by the time since it was last reinforced, then forget
    /// anything below the minimum weight.
    pub fn decay(&mut self, tick: u64, config: &MemoryConfig) {
        for memory in &mut self.memories {
            let delta = tick.saturating_sub(memory.last_reinforced_tick) as f64;
            memory.weight *= (-config.decay_rate * delta).exp();
        }
        self.memories.retain(|m| m.weight >= config.min_weight);
    }

    /// Up to `limit` memories, heaviest first. Equal weights keep insertion order.
    pub fn most_salient(&self, limit: usize) -> Vec<&Memory> {
        let mut ranked: Vec<&Memory> = self.memories.iter().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        ranked.truncate(limit);
        ranked
    }

    /// How strongly the store holds opposite feelings at once, 0.0 to 0.25.
    pub fn conflict_score(&self, config: &MemoryConfig) -> f64 {
        if self.memories.len() < 2 {
            return 0.0;
        }

        let positive: Vec<f64> = self
            .memories
            .iter()
            .filter(|m| m.valence > config.conflict_valence)
            .map(|m| m.weight)
            .collect();
        let negative: Vec<f64> = self
            .memories
            .iter()
            .filter(|m| m.valence < -config.conflict_valence)
            .map(|m| m.weight)
            .collect();
        if positive.is_empty() || negative.is_empty() {
            return 0.0;
        }

        let held = positive.iter().sum::<f64>() + negative.iter().sum::<f64>();
        held.min(1.0) / config.conflict_divisor
    }
}

fn sanitize(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min.max(0.0)
    } else {
        value.clamp(min, max)
    }
}
