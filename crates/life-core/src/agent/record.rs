//! Conversion between a live agent and its persisted record, including the
//! migration of older records.

use life_events::{AgentRecord, EncounterRecord, Temperament};

use super::state::{Encounter, StateVector};
use super::LifeAgent;
use crate::config::Tuning;
use crate::memory::{Memory, MemoryStore};
use crate::timeline::Timeline;

const SLUG_ID_CHARS: usize = 6;

/// Display slug: `<species>-<first 6 hex chars of the id>`.
pub fn derive_slug(species: &str, id: &str) -> String {
    let species = if species.is_empty() { "unknown" } else { species };
    let prefix: String = id
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(SLUG_ID_CHARS)
        .collect::<String>()
        .to_ascii_lowercase();
    format!("{}-{}", species, prefix)
}

impl LifeAgent {
    pub fn to_record(&self) -> AgentRecord {
        AgentRecord {
            agent_id: self.id.clone(),
            created_at: self.created_at,
            age_ticks: self.age_ticks,
            phase: self.phase.to_string(),
            state: self.state.to_axes(),
            pressure: self.pressure,
            tolerance: self.tolerance,
            last_expression_tick: self.last_expression_tick,
            seed: self.seed,
            creator: self.creator.clone(),
            species: self.species.clone(),
            slug: self.slug.clone(),
            temperament: self.temperament.iter().map(|t| t.as_str().to_string()).collect(),
            encounters: self
                .encounters
                .iter()
                .map(|(id, e)| {
                    (
                        id.clone(),
                        EncounterRecord {
                            score: e.score,
                            last_tick: e.last_tick,
                        },
                    )
                })
                .collect(),
            silent_until_tick: self.silent_until_tick,
            missing_until_tick: self.missing_until_tick,
            memory: self.memory.memories().iter().map(Memory::to_record).collect(),
            next_memory_seq: Some(self.memory.next_sequence()),
            timeline: self.timeline.to_records(),
        }
    }

    /// Rebuild an agent from a record.
    ///
    /// Legacy axis names are remapped and missing axes default; a missing slug
    /// is derived; unknown temperament labels are dropped; the phase is
    /// recomputed from age; scalars are clamped back into bounds.
    pub fn from_record(record: AgentRecord, tuning: &Tuning) -> LifeAgent {
        let id = record.agent_id;

        let (state, defaulted) = StateVector::from_axes(&record.state);
        if !defaulted.is_empty() {
            tracing::warn!(agent = %id, ?defaulted, "record missing state axes, using defaults");
        }

        let slug = if record.slug.is_empty() {
            let slug = derive_slug(&record.species, &id);
            tracing::debug!(agent = %id, %slug, "derived missing slug");
            slug
        } else {
            record.slug
        };

        let mut temperament = Vec::with_capacity(record.temperament.len());
        for label in &record.temperament {
            match label.parse::<Temperament>() {
                Ok(t) if !temperament.contains(&t) => temperament.push(t),
                Ok(_) => {}
                Err(err) => tracing::warn!(agent = %id, %err, "dropping temperament label"),
            }
        }

        let memories: Vec<Memory> = record.memory.into_iter().map(Memory::from_record).collect();
        let memory = match record.next_memory_seq {
            Some(next) => MemoryStore::restore(memories, next),
            None => MemoryStore::from_memories(memories),
        };

        let pressure = &tuning.pressure;
        let age_ticks = record.age_ticks;
        let last_expression_tick = record.last_expression_tick.min(age_ticks as i64);

        LifeAgent {
            phase: tuning.phases.phase_for(age_ticks),
            state,
            pressure: finite_or(record.pressure, 0.0).clamp(0.0, pressure.max),
            tolerance: finite_or(record.tolerance, pressure.tolerance_base)
                .clamp(pressure.tolerance_min, pressure.tolerance_max),
            last_expression_tick,
            species: record.species,
            slug,
            temperament,
            encounters: record
                .encounters
                .into_iter()
                .map(|(peer, e)| {
                    (
                        peer,
                        Encounter {
                            score: finite_or(e.score, 0.0).clamp(0.0, 1.0),
                            last_tick: e.last_tick,
                        },
                    )
                })
                .collect(),
            silent_until_tick: record.silent_until_tick,
            missing_until_tick: record.missing_until_tick,
            memory,
            timeline: Timeline::from_records(record.timeline),
            seed: record.seed,
            creator: record.creator,
            created_at: record.created_at,
            age_ticks,
            id,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
