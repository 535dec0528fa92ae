//! Peer Feed
//!
//! Read-only view of another agent's public expression.

use serde::{Deserialize, Serialize};

/// One public post from another agent, as handed to a ticking agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPost {
    pub agent_id: String,
    pub sentences: Vec<String>,
    pub origination_tick: u64,
    pub public_tick: u64,
}

impl PeerPost {
    pub fn new(
        agent_id: impl Into<String>,
        sentences: Vec<String>,
        origination_tick: u64,
        public_tick: u64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            sentences,
            origination_tick,
            public_tick,
        }
    }

    pub fn has_content(&self) -> bool {
        self.sentences.iter().any(|s| !s.trim().is_empty())
    }
}
