//! Timeline
//!
//! Append-only log of an agent's expressions with their time-shifted
//! public visibility.

use life_events::ExpressionRecord;

/// Marker placed before silence gaps when rendering
pub const SILENCE_MARKER: &str = "...";

/// One produced expression. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionEntry {
    pub origination_tick: u64,
    pub sentences: Vec<String>,
    /// May be before or after the origination tick
    pub public_tick: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<ExpressionEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expression(
        &mut self,
        origination_tick: u64,
        sentences: Vec<String>,
        public_tick: u64,
    ) {
        self.entries.push(ExpressionEntry {
            origination_tick,
            sentences,
            public_tick,
        });
    }

    pub fn entries(&self) -> &[ExpressionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sentences interleaved with "N ticks of silence" markers for every gap
    /// between consecutive expressions and up to `current_tick`.
    pub fn render(&self, current_tick: u64) -> Vec<String> {
        let mut rendered = Vec::new();
        let mut last_tick = 0u64;
        for entry in &self.entries {
            let gap = entry.origination_tick.saturating_sub(last_tick);
            if gap > 0 {
                rendered.push(silence_line(gap));
            }
            rendered.extend(entry.sentences.iter().cloned());
            last_tick = entry.origination_tick;
        }

        let final_gap = current_tick.saturating_sub(last_tick);
        if final_gap > 0 {
            rendered.push(silence_line(final_gap));
        }
        rendered
    }

    pub fn to_records(&self) -> Vec<ExpressionRecord> {
        self.entries
            .iter()
            .map(|entry| ExpressionRecord {
                origination_tick: entry.origination_tick,
                sentences: entry.sentences.clone(),
                public_tick: Some(entry.public_tick),
            })
            .collect()
    }

    pub fn from_records(records: Vec<ExpressionRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| ExpressionEntry {
                public_tick: record.visible_at(),
                origination_tick: record.origination_tick,
                sentences: record.sentences,
            })
            .collect();
        Self { entries }
    }
}

fn silence_line(gap: u64) -> String {
    format!("{} ({} ticks of silence)", SILENCE_MARKER, gap)
}
