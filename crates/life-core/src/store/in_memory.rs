use std::collections::BTreeMap;

use life_events::{AgentRecord, ArchiveSnapshot, PeerPost};

use super::{latest_post, rank_posts, AgentRepository, ArchiveSink};
use crate::agent::LifeAgent;
use crate::config::Tuning;
use crate::error::StoreError;

/// In-process repository and archive sink.
///
/// Agents are kept as serialized records, so every save and load goes through
/// the same conversion a durable store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tuning: Tuning,
    records: BTreeMap<String, AgentRecord>,
    archives: BTreeMap<String, Vec<ArchiveSnapshot>>,
}

impl MemoryRepository {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            records: BTreeMap::new(),
            archives: BTreeMap::new(),
        }
    }

    /// Store a raw record, as if written by an older version.
    pub fn insert_record(&mut self, record: AgentRecord) {
        self.records.insert(record.agent_id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn snapshots(&self, agent_id: &str) -> &[ArchiveSnapshot] {
        self.archives.get(agent_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl AgentRepository for MemoryRepository {
    fn list_ids(&self, creator: Option<&str>) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|r| creator.map_or(true, |c| r.creator == c))
            .map(|r| r.agent_id.clone())
            .collect())
    }

    fn load(&self, id: &str) -> Result<LifeAgent, StoreError> {
        let record = self
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(LifeAgent::from_record(record, &self.tuning))
    }

    fn save(&mut self, agent: &LifeAgent) -> Result<(), StoreError> {
        self.records.insert(agent.id.clone(), agent.to_record());
        Ok(())
    }

    fn load_recent_public_posts(
        &self,
        exclude: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PeerPost>, StoreError> {
        let posts = self
            .records
            .values()
            .filter(|r| Some(r.agent_id.as_str()) != exclude)
            .filter_map(latest_post)
            .collect();
        Ok(rank_posts(posts, limit))
    }

    fn find_by_public_slug(&self, slug: &str) -> Result<Option<LifeAgent>, StoreError> {
        if let Some(record) = self.records.values().find(|r| r.slug == slug) {
            return self.load(&record.agent_id).map(Some);
        }
        // Records without a stored slug only get one when loaded.
        for record in self.records.values().filter(|r| r.slug.is_empty()) {
            let agent = LifeAgent::from_record(record.clone(), &self.tuning);
            if agent.slug == slug {
                return Ok(Some(agent));
            }
        }
        Ok(None)
    }
}

impl ArchiveSink for MemoryRepository {
    fn save_snapshot(
        &mut self,
        agent_id: &str,
        snapshot: &ArchiveSnapshot,
    ) -> Result<(), StoreError> {
        self.archives
            .entry(agent_id.to_string())
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }
}
