//! Persistence Collaborators
//!
//! The engine never touches storage mid-tick. The simulator talks to an
//! [`AgentRepository`] and an [`ArchiveSink`] at round boundaries.

mod in_memory;
mod json;

pub use in_memory::MemoryRepository;
pub use json::JsonDirectoryStore;

use life_events::{AgentRecord, ArchiveSnapshot, PeerPost};

use crate::agent::LifeAgent;
use crate::error::StoreError;

/// Where agents live between ticks
pub trait AgentRepository {
    /// Ids of stored agents, optionally only those made by `creator`. Sorted.
    fn list_ids(&self, creator: Option<&str>) -> Result<Vec<String>, StoreError>;

    fn load(&self, id: &str) -> Result<LifeAgent, StoreError>;

    fn save(&mut self, agent: &LifeAgent) -> Result<(), StoreError>;

    /// The latest post of every agent other than `exclude`, newest public
    /// tick first, at most `limit` of them.
    fn load_recent_public_posts(
        &self,
        exclude: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PeerPost>, StoreError>;

    fn find_by_public_slug(&self, slug: &str) -> Result<Option<LifeAgent>, StoreError>;
}

/// Where archive snapshots go
pub trait ArchiveSink {
    fn save_snapshot(
        &mut self,
        agent_id: &str,
        snapshot: &ArchiveSnapshot,
    ) -> Result<(), StoreError>;
}

/// The latest expression of a record as a feed post.
pub(crate) fn latest_post(record: &AgentRecord) -> Option<PeerPost> {
    record.timeline.last().map(|entry| {
        PeerPost::new(
            record.agent_id.clone(),
            entry.sentences.clone(),
            entry.origination_tick,
            entry.visible_at(),
        )
    })
}

/// Order posts newest public tick first (ties by agent id) and keep `limit`.
pub(crate) fn rank_posts(mut posts: Vec<PeerPost>, limit: usize) -> Vec<PeerPost> {
    posts.sort_by(|a, b| {
        b.public_tick
            .cmp(&a.public_tick)
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });
    posts.truncate(limit);
    posts
}
