use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use life_events::{AgentRecord, ArchiveSnapshot, PeerPost};

use super::{latest_post, rank_posts, AgentRepository, ArchiveSink};
use crate::agent::{derive_slug, LifeAgent};
use crate::config::Tuning;
use crate::error::StoreError;

const ANIMALS_DIR: &str = "animals";
const ARCHIVES_DIR: &str = "archives";

/// One pretty-printed JSON file per agent under `<root>/animals/`, archive
/// snapshots under `<root>/archives/<id>/<tick>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
    tuning: Tuning,
}

impl JsonDirectoryStore {
    /// Open a store rooted at `root`. Directories are created on first write.
    pub fn open(root: impl Into<PathBuf>, tuning: Tuning) -> Self {
        Self {
            root: root.into(),
            tuning,
        }
    }

    fn animals_dir(&self) -> PathBuf {
        self.root.join(ANIMALS_DIR)
    }

    fn agent_path(&self, id: &str) -> PathBuf {
        self.animals_dir().join(format!("{}.json", id))
    }

    /// Read `<id>.json`. The file name is the agent's identity: a record whose
    /// stored id disagrees is re-keyed to it, so a later save rewrites the
    /// same file.
    fn read_record(&self, id: &str) -> Result<AgentRecord, StoreError> {
        let content = match fs::read_to_string(self.agent_path(id)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut record: AgentRecord = serde_json::from_str(&content)?;
        if record.agent_id != id {
            tracing::warn!(
                file = %id,
                stored = %record.agent_id,
                "record id differs from file name, using file name"
            );
            record.agent_id = id.to_string();
        }
        Ok(record)
    }

    /// Every readable record, sorted by id. Unreadable files are skipped.
    fn readable_records(&self) -> Result<Vec<AgentRecord>, StoreError> {
        let mut records = Vec::new();
        for id in self.stored_ids()? {
            match self.read_record(&id) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(agent = %id, error = %e, "skipping unreadable agent file"),
            }
        }
        Ok(records)
    }

    fn stored_ids(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(self.animals_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl AgentRepository for JsonDirectoryStore {
    fn list_ids(&self, creator: Option<&str>) -> Result<Vec<String>, StoreError> {
        match creator {
            None => self.stored_ids(),
            Some(creator) => Ok(self
                .readable_records()?
                .into_iter()
                .filter(|r| r.creator == creator)
                .map(|r| r.agent_id)
                .collect()),
        }
    }

    fn load(&self, id: &str) -> Result<LifeAgent, StoreError> {
        let record = self.read_record(id)?;
        Ok(LifeAgent::from_record(record, &self.tuning))
    }

    fn save(&mut self, agent: &LifeAgent) -> Result<(), StoreError> {
        fs::create_dir_all(self.animals_dir())?;
        let json = serde_json::to_string_pretty(&agent.to_record())?;
        fs::write(self.agent_path(&agent.id), json)?;
        Ok(())
    }

    fn load_recent_public_posts(
        &self,
        exclude: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PeerPost>, StoreError> {
        let posts = self
            .readable_records()?
            .iter()
            .filter(|r| Some(r.agent_id.as_str()) != exclude)
            .filter_map(latest_post)
            .collect();
        Ok(rank_posts(posts, limit))
    }

    fn find_by_public_slug(&self, slug: &str) -> Result<Option<LifeAgent>, StoreError> {
        let found = self.readable_records()?.into_iter().find(|r| {
            if r.slug.is_empty() {
                derive_slug(&r.species, &r.agent_id) == slug
            } else {
                r.slug == slug
            }
        });
        Ok(found.map(|record| LifeAgent::from_record(record, &self.tuning)))
    }
}

impl ArchiveSink for JsonDirectoryStore {
    fn save_snapshot(
        &mut self,
        agent_id: &str,
        snapshot: &ArchiveSnapshot,
    ) -> Result<(), StoreError> {
        let dir = self.root.join(ARCHIVES_DIR).join(agent_id);
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(dir.join(format!("{}.json", snapshot.tick)), json)?;
        tracing::debug!(agent = %agent_id, tick = snapshot.tick, "archive snapshot written");
        Ok(())
    }
}
