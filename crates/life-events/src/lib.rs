//! Shared data types for the life simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod feed;
pub mod labels;
pub mod record;
pub mod signals;
pub mod snapshot;

pub use feed::PeerPost;
pub use labels::{ParseLabelError, Phase, Temperament};
pub use record::{AgentRecord, EncounterRecord, ExpressionRecord, MemoryRecord};
pub use signals::WorldSignals;
pub use snapshot::ArchiveSnapshot;
