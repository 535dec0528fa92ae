//! Simulator
//!
//! Drives rounds over the stored population. A round:
//!
//! 1. lists agent ids (sorted) and samples the configured fraction,
//! 2. reads the public feed once and loads each selected agent, all before
//!    any tick runs,
//! 3. ticks them (on a rayon pool when configured),
//! 4. saves results and archive snapshots in id order,
//! 5. rolls once for a birth.
//!
//! The simulator's own generator only drives sampling and births; every agent
//! ticks from its own seed, so results do not depend on the worker count.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use life_events::PeerPost;

use crate::agent::LifeAgent;
use crate::archive::create_snapshot;
use crate::config::Tuning;
use crate::error::{SimulationError, StoreError};
use crate::store::{AgentRepository, ArchiveSink};
use crate::world::WorldSignalStream;

/// Totals for one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub ticks: u64,
    /// Agent ticks that produced output
    pub expressions: u64,
    pub agents_ticked: u64,
    pub births: u64,
    pub archived: u64,
}

pub struct Simulator<S> {
    store: S,
    world: WorldSignalStream,
    tuning: Tuning,
    rng: SmallRng,
    pool: Option<rayon::ThreadPool>,
    rounds: u64,
}

impl<S: AgentRepository + ArchiveSink> Simulator<S> {
    /// `start_time` is the Unix second that round 0 corresponds to.
    pub fn new(store: S, tuning: Tuning, seed: u64, start_time: u64) -> Self {
        let workers = tuning.simulation.worker_threads;
        let pool = if workers > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::warn!(
                        workers,
                        error = %e,
                        "could not build worker pool, ticking sequentially"
                    );
                    None
                }
            }
        } else {
            None
        };

        Self {
            store,
            world: WorldSignalStream::new(seed, start_time, tuning.world),
            tuning,
            rng: SmallRng::seed_from_u64(seed),
            pool,
            rounds: 0,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &WorldSignalStream {
        &self.world
    }

    /// Rounds completed over the simulator's lifetime
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Birth a new agent for `creator` and store it.
    pub fn spawn(&mut self, creator: &str) -> Result<LifeAgent, StoreError> {
        let created_at = self.world.wall_clock_for(self.rounds);
        let agent = LifeAgent::birth(creator, created_at, &self.tuning, &mut self.rng);
        self.store.save(&agent)?;
        Ok(agent)
    }

    pub fn run(&mut self, ticks: u64) -> Result<SimulationReport, SimulationError> {
        self.run_until(ticks, &AtomicBool::new(false))
    }

    /// Like [`Simulator::run`], checking `cancel` before each round. Every
    /// finished round is fully saved.
    pub fn run_until(
        &mut self,
        ticks: u64,
        cancel: &AtomicBool,
    ) -> Result<SimulationReport, SimulationError> {
        let mut report = SimulationReport::default();
        for completed in 0..ticks {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(completed, requested = ticks, "simulation cancelled");
                return Err(SimulationError::Cancelled {
                    completed_ticks: completed,
                });
            }
            self.run_round(&mut report)?;
            report.ticks += 1;
        }

        tracing::info!(
            ticks = report.ticks,
            expressions = report.expressions,
            agents_ticked = report.agents_ticked,
            births = report.births,
            archived = report.archived,
            "simulation finished"
        );
        Ok(report)
    }

    fn run_round(&mut self, report: &mut SimulationReport) -> Result<(), StoreError> {
        let ids = self.store.list_ids(None)?;
        let selected = self.sample(&ids);

        let limit = self.tuning.simulation.feed_limit;
        // One extra post covers the reader's own, which is filtered out below.
        let posts = self.store.load_recent_public_posts(None, limit.saturating_add(1))?;
        let mut workloads = Vec::with_capacity(selected.len());
        for id in &selected {
            let agent = match self.store.load(id) {
                Ok(agent) => agent,
                Err(StoreError::Serde(e)) => {
                    tracing::warn!(agent = %id, error = %e, "skipping unreadable agent");
                    continue;
                }
                Err(e) => return Err(e),
            };
            workloads.push((agent, feed_for(&posts, id, limit)));
        }

        let results = self.tick_all(workloads);

        let mut expressions = 0u64;
        let interval = self.tuning.simulation.archive_interval_ticks;
        for (agent, spoken) in &results {
            report.agents_ticked += 1;
            if spoken.is_some() {
                expressions += 1;
            }
            if interval > 0 && agent.age_ticks % interval == 0 {
                let snapshot = create_snapshot(agent);
                self.store.save_snapshot(&agent.id, &snapshot)?;
                report.archived += 1;
                tracing::debug!(
                    agent = %agent.id,
                    tick = agent.age_ticks,
                    "archive snapshot requested"
                );
            }
            self.store.save(agent)?;
        }
        report.expressions += expressions;

        let born = self.maybe_birth(&ids, report.births)?;
        if born {
            report.births += 1;
        }

        tracing::info!(
            round = self.rounds,
            population = ids.len(),
            ticked = results.len(),
            expressions,
            born,
            "round complete"
        );
        self.rounds += 1;
        Ok(())
    }

    /// The ids to tick this round, in sorted order.
    fn sample(&mut self, ids: &[String]) -> Vec<String> {
        let fraction = self.tuning.simulation.tick_fraction;
        if fraction >= 1.0 || ids.is_empty() {
            return ids.to_vec();
        }

        let count = ((ids.len() as f64 * fraction).round() as usize).clamp(1, ids.len());
        let mut chosen: Vec<String> = ids.choose_multiple(&mut self.rng, count).cloned().collect();
        chosen.sort();
        chosen
    }

    fn tick_all(
        &self,
        workloads: Vec<(LifeAgent, Vec<PeerPost>)>,
    ) -> Vec<(LifeAgent, Option<Vec<String>>)> {
        let world = &self.world;
        let tuning = &self.tuning;
        let tick_one = |(mut agent, feed): (LifeAgent, Vec<PeerPost>)| {
            let signals = world.signals_for_tick(agent.age_ticks);
            let spoken = agent.tick(&signals, &feed, tuning);
            (agent, spoken)
        };

        match &self.pool {
            Some(pool) if workloads.len() > 1 => {
                pool.install(|| workloads.into_par_iter().map(tick_one).collect())
            }
            _ => workloads.into_iter().map(tick_one).collect(),
        }
    }

    /// Roll once for a birth. The newborn shares the creator of a random
    /// existing agent.
    fn maybe_birth(&mut self, ids: &[String], births_so_far: u64) -> Result<bool, StoreError> {
        let config = &self.tuning.simulation;
        if self.rng.gen::<f64>() >= config.birth_chance {
            return Ok(false);
        }
        if births_so_far >= config.births_per_run as u64 || ids.len() >= config.population_target {
            return Ok(false);
        }
        let Some(parent_id) = ids.choose(&mut self.rng) else {
            return Ok(false);
        };

        let creator = match self.store.load(parent_id) {
            Ok(parent) => parent.creator,
            Err(StoreError::Serde(e)) => {
                tracing::warn!(agent = %parent_id, error = %e, "birth skipped, parent unreadable");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let child = self.spawn(&creator)?;
        tracing::debug!(agent = %child.id, parent = %parent_id, creator = %creator, "birth");
        Ok(true)
    }
}

/// The round's feed as seen by `reader`: every post but its own.
fn feed_for(posts: &[PeerPost], reader: &str, limit: usize) -> Vec<PeerPost> {
    posts
        .iter()
        .filter(|post| post.agent_id != reader)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use life_events::ArchiveSnapshot;

    use crate::store::MemoryRepository;

    /// Counts feed reads on top of an in-memory repository.
    struct CountingRepository {
        inner: MemoryRepository,
        feed_reads: Cell<u64>,
    }

    impl AgentRepository for CountingRepository {
        fn list_ids(&self, creator: Option<&str>) -> Result<Vec<String>, StoreError> {
            self.inner.list_ids(creator)
        }

        fn load(&self, id: &str) -> Result<LifeAgent, StoreError> {
            self.inner.load(id)
        }

        fn save(&mut self, agent: &LifeAgent) -> Result<(), StoreError> {
            self.inner.save(agent)
        }

        fn load_recent_public_posts(
            &self,
            exclude: Option<&str>,
            limit: usize,
        ) -> Result<Vec<PeerPost>, StoreError> {
            self.feed_reads.set(self.feed_reads.get() + 1);
            self.inner.load_recent_public_posts(exclude, limit)
        }

        fn find_by_public_slug(&self, slug: &str) -> Result<Option<LifeAgent>, StoreError> {
            self.inner.find_by_public_slug(slug)
        }
    }

    impl ArchiveSink for CountingRepository {
        fn save_snapshot(
            &mut self,
            agent_id: &str,
            snapshot: &ArchiveSnapshot,
        ) -> Result<(), StoreError> {
            self.inner.save_snapshot(agent_id, snapshot)
        }
    }

    fn simulator(tuning: Tuning, agents: usize) -> Simulator<MemoryRepository> {
        let store = MemoryRepository::new(tuning.clone());
        let mut sim = Simulator::new(store, tuning, 7, 1_700_000_000);
        for i in 0..agents {
            sim.spawn(&format!("creator-{}", i % 2)).unwrap();
        }
        sim
    }

    #[test]
    fn test_run_ages_every_agent() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 0.0;
        let mut sim = simulator(tuning, 3);

        let report = sim.run(5).unwrap();
        assert_eq!(report.ticks, 5);
        assert_eq!(report.agents_ticked, 15);
        assert_eq!(report.births, 0);
        for id in sim.store().list_ids(None).unwrap() {
            assert_eq!(sim.store().load(&id).unwrap().age_ticks, 5);
        }
    }

    #[test]
    fn test_fraction_samples_subset() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 0.0;
        tuning.simulation.tick_fraction = 0.5;
        let mut sim = simulator(tuning, 4);

        let report = sim.run(3).unwrap();
        assert_eq!(report.agents_ticked, 6);
        let total_age: u64 = sim
            .store()
            .list_ids(None)
            .unwrap()
            .iter()
            .map(|id| sim.store().load(id).unwrap().age_ticks)
            .sum();
        assert_eq!(total_age, 6);
    }

    #[test]
    fn test_births_are_bounded() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 1.0;
        tuning.simulation.births_per_run = 2;
        let mut sim = simulator(tuning, 1);

        let report = sim.run(10).unwrap();
        assert_eq!(report.births, 2);
        assert_eq!(sim.store().len(), 3);
        for id in sim.store().list_ids(None).unwrap() {
            assert_eq!(sim.store().load(&id).unwrap().creator, "creator-0");
        }
    }

    #[test]
    fn test_population_target_stops_births() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 1.0;
        tuning.simulation.population_target = 2;
        let mut sim = simulator(tuning, 2);
        assert_eq!(sim.run(5).unwrap().births, 0);
    }

    #[test]
    fn test_empty_population_never_births() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 1.0;
        let mut sim = simulator(tuning, 0);
        let report = sim.run(3).unwrap();
        assert_eq!(report, SimulationReport { ticks: 3, ..SimulationReport::default() });
    }

    #[test]
    fn test_archive_interval() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 0.0;
        tuning.simulation.archive_interval_ticks = 4;
        let mut sim = simulator(tuning, 2);

        let report = sim.run(9).unwrap();
        assert_eq!(report.archived, 4);
        let id = sim.store().list_ids(None).unwrap()[0].clone();
        let ticks: Vec<u64> = sim.store().snapshots(&id).iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![4, 8]);
    }

    #[test]
    fn test_feed_read_once_per_round() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 0.0;
        let store = CountingRepository {
            inner: MemoryRepository::new(tuning.clone()),
            feed_reads: Cell::new(0),
        };
        let mut sim = Simulator::new(store, tuning, 3, 0);
        for _ in 0..6 {
            sim.spawn("ana").unwrap();
        }

        sim.run(40).unwrap();
        assert_eq!(sim.store().feed_reads.get(), 40);
    }

    #[test]
    fn test_round_feed_matches_per_reader_query() {
        let mut tuning = Tuning::default();
        tuning.simulation.birth_chance = 0.0;
        tuning.simulation.feed_limit = 3;
        let mut sim = simulator(tuning, 6);
        sim.run(400).unwrap();

        let store = sim.store();
        let posts = store.load_recent_public_posts(None, 4).unwrap();
        assert!(posts.len() > 3, "most agents should have spoken in 400 ticks");
        for id in store.list_ids(None).unwrap() {
            let expected = store.load_recent_public_posts(Some(&id), 3).unwrap();
            assert_eq!(feed_for(&posts, &id, 3), expected);
        }
    }

    #[test]
    fn test_cancel_before_first_round() {
        let mut sim = simulator(Tuning::default(), 1);
        let cancel = AtomicBool::new(true);
        let err = sim.run_until(4, &cancel).unwrap_err();
        assert!(matches!(err, SimulationError::Cancelled { completed_ticks: 0 }));
        assert_eq!(sim.rounds(), 0);
    }
}
