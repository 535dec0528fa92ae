use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use life_events::Temperament;

use super::record::derive_slug;
use super::state::{Axis, StateVector};
use super::LifeAgent;
use crate::config::Tuning;
use crate::memory::MemoryStore;
use crate::timeline::Timeline;

/// Species a newborn may be
pub const SPECIES: &[&str] = &[
    "aardvark", "albatross", "alpaca", "antelope", "armadillo", "badger", "bat", "beaver", "bison",
    "boar", "bobcat", "capybara", "caribou", "chameleon", "cheetah", "chinchilla", "cormorant",
    "coyote", "crane", "crow", "deer", "dingo", "dolphin", "dormouse", "eagle", "egret", "elk",
    "ermine", "falcon", "ferret", "finch", "fox", "gazelle", "gecko", "gibbon", "giraffe", "goat",
    "gopher", "hare", "hawk", "hedgehog", "heron", "hippo", "hyena", "ibex", "iguana", "jackal",
    "jaguar", "kestrel", "kingfisher", "koala", "lemur", "leopard", "lizard", "llama", "lynx",
    "magpie", "manatee", "marmot", "marten", "meerkat", "mink", "mole", "mongoose", "moose",
    "newt", "ocelot", "okapi", "opossum", "orca", "osprey", "otter", "owl", "panda", "pangolin",
    "panther", "pelican", "pika", "porcupine", "possum", "puffin", "quail", "rabbit", "raccoon",
    "raven", "reindeer", "salamander", "seal", "shrew", "skunk", "sloth", "sparrow", "squirrel",
    "stoat", "swan", "tapir", "tortoise", "vole", "walrus", "weasel", "wolf", "wombat", "yak",
];

/// Temperament labels drawn for a newborn
const BIRTH_TEMPERAMENTS: usize = 2;

impl LifeAgent {
    /// Create a newborn with randomized state, species and temperament.
    pub fn birth<R: Rng>(
        creator: &str,
        created_at: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> LifeAgent {
        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string();
        let species = SPECIES.choose(rng).copied().unwrap_or("unknown").to_string();
        let slug = derive_slug(&species, &id);
        let temperament: Vec<Temperament> = Temperament::ALL
            .choose_multiple(rng, BIRTH_TEMPERAMENTS)
            .copied()
            .collect();

        let state_config = &tuning.state;
        let mut state = StateVector::default();
        for axis in Axis::ALL {
            state.set(axis, rng.gen_range(state_config.initial_min..=state_config.initial_max));
        }

        let pressure = &tuning.pressure;
        let initial_pressure = rng.gen_range(pressure.initial_min..=pressure.initial_max);
        let variance = pressure.tolerance_variance;
        let tolerance = (pressure.tolerance_base + rng.gen_range(-variance..=variance))
            .clamp(pressure.tolerance_min, pressure.tolerance_max);

        let agent = LifeAgent {
            id,
            created_at,
            age_ticks: 0,
            phase: tuning.phases.phase_for(0),
            state,
            pressure: initial_pressure.clamp(0.0, pressure.max),
            tolerance,
            last_expression_tick: 0,
            species,
            slug,
            temperament,
            encounters: BTreeMap::new(),
            silent_until_tick: 0,
            missing_until_tick: 0,
            memory: MemoryStore::new(),
            timeline: Timeline::new(),
            seed: rng.gen(),
            creator: creator.to_string(),
        };
        tracing::debug!(agent = %agent.id, species = %agent.species, creator, "agent born");
        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_events::Phase;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_birth_within_bounds() {
        let tuning = Tuning::default();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let agent = LifeAgent::birth("someone", 1.0, &tuning, &mut rng);
            assert_eq!(agent.age_ticks, 0);
            assert_eq!(agent.phase, Phase::Infant);
            assert!(agent.tolerance >= 0.35 && agent.tolerance <= 0.95);
            assert!(agent.pressure >= 0.05 && agent.pressure <= 0.25);
            for axis in Axis::ALL {
                let v = agent.state.get(axis);
                assert!((0.25..=0.75).contains(&v));
            }
            assert_eq!(agent.temperament.len(), 2);
            assert_ne!(agent.temperament[0], agent.temperament[1]);
            assert!(SPECIES.contains(&agent.species.as_str()));
            assert!(agent.slug.starts_with(&format!("{}-", agent.species)));
            assert!(agent.memory.is_empty());
            assert!(agent.timeline.is_empty());
        }
    }

    #[test]
    fn test_birth_is_reproducible() {
        let tuning = Tuning::default();
        let a = LifeAgent::birth("c", 5.0, &tuning, &mut SmallRng::seed_from_u64(42));
        let b = LifeAgent::birth("c", 5.0, &tuning, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_species_unique() {
        let mut sorted = SPECIES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), SPECIES.len());
    }
}
