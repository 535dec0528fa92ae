//! Archive Snapshot Types
//!
//! Periodic summaries of an agent, persisted by an archive sink.

use serde::{Deserialize, Serialize};

/// A point-in-time summary of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSnapshot {
    pub tick: u64,
    pub summary: String,
    #[serde(default)]
    pub memory_fragments: Vec<String>,
}
