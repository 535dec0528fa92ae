//! Life Simulation Core
//!
//! Long-lived animal agents that age, drift, remember and occasionally speak.
//! Each agent's tick is deterministic in its seed and age; the simulator fans
//! ticks out over the stored population in rounds.

pub mod agent;
pub mod archive;
pub mod config;
pub mod error;
pub mod expression;
pub mod memory;
pub mod simulator;
pub mod store;
pub mod timeline;
pub mod world;

pub use agent::{Action, Axis, Encounter, LifeAgent, RareEvent, StateVector};
pub use archive::{create_snapshot, describe_activity};
pub use config::Tuning;
pub use error::{ConfigError, SimulationError, StoreError};
pub use memory::{Memory, MemoryStore};
pub use simulator::{SimulationReport, Simulator};
pub use store::{AgentRepository, ArchiveSink, JsonDirectoryStore, MemoryRepository};
pub use timeline::{ExpressionEntry, Timeline};
pub use world::WorldSignalStream;
