//! Archive snapshots and human-readable activity descriptions.

use life_events::ArchiveSnapshot;

use crate::agent::LifeAgent;

/// Memories carried into a snapshot
pub const SNAPSHOT_FRAGMENTS: usize = 3;

pub fn create_snapshot(agent: &LifeAgent) -> ArchiveSnapshot {
    let state = &agent.state;
    let summary = format!(
        "Phase: {}. Arousal {:.2}, Curiosity {:.2}, Fatigue {:.2}, Social tolerance {:.2}.",
        agent.phase,
        state.arousal(),
        state.curiosity(),
        state.fatigue(),
        state.social_tolerance(),
    );
    let memory_fragments = agent
        .memory
        .most_salient(SNAPSHOT_FRAGMENTS)
        .into_iter()
        .map(|m| m.text.clone())
        .collect();

    ArchiveSnapshot {
        tick: agent.age_ticks,
        summary,
        memory_fragments,
    }
}

/// One line describing how recently the agent was heard from.
pub fn describe_activity(agent: &LifeAgent) -> &'static str {
    if agent.is_missing() {
        return "Absent. No trace.";
    }
    if agent.timeline.is_empty() {
        return "Quiet since birth.";
    }
    match agent.ticks_since_expression() {
        t if t > 200 => "Quiet for a long while.",
        t if t > 60 => "Quiet recently.",
        t if t > 20 => "Stirred not long ago.",
        _ => "Active recently.",
    }
}
