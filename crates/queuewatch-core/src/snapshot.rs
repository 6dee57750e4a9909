use serde::{Deserialize, Serialize};

use crate::agent::AgentRecord;
use crate::alerts::{AlertEntry, AlertKind, AuxEntry};
use crate::queue::{SkillDashboardRecord, SkillQueueRecord};

/// Everything one viewer sees, as of the latest successful refresh.
///
/// Built in full by the refresh loop and published as a unit; nothing
/// mutates a snapshot after it is published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub agents: Vec<AgentRecord>,
    pub alerts: Vec<AlertEntry>,
    pub aux: Vec<AuxEntry>,
    /// Zero-filled, one entry per registry skill, sorted by name.
    pub queue: Vec<SkillQueueRecord>,
    /// Only skills present in the report.
    pub dashboard: Vec<SkillDashboardRecord>,
    pub total_calls_in_queue: u64,
    /// `None` until the first refresh succeeds.
    pub refreshed_at: Option<String>,
}

impl ViewerSnapshot {
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn aux_count(&self) -> usize {
        self.aux.len()
    }

    /// Alerts grouped by kind in first-seen order, one
    /// `"<id> - <name> (<duration>)"` line per agent.
    pub fn alerts_by_kind(&self) -> Vec<(AlertKind, Vec<String>)> {
        let mut groups: Vec<(AlertKind, Vec<String>)> = Vec::new();
        for alert in &self.alerts {
            let line = format!("{} - {} ({})", alert.avaya_id, alert.full_name, alert.duration);
            match groups.iter_mut().find(|(kind, _)| *kind == alert.kind) {
                Some((_, lines)) => lines.push(line),
                None => groups.push((alert.kind, vec![line])),
            }
        }
        groups
    }

    /// AUX entries grouped by reason code in first-seen order.
    pub fn aux_by_reason(&self) -> Vec<(String, Vec<String>)> {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for entry in &self.aux {
            let line = format!(
                "{} - {} ({})",
                entry.avaya_id, entry.full_name, entry.time_in_state
            );
            match groups
                .iter_mut()
                .find(|(reason, _)| *reason == entry.reason_code)
            {
                Some((_, lines)) => lines.push(line),
                None => groups.push((entry.reason_code.clone(), vec![line])),
            }
        }
        groups
    }

    /// Queue entries with at least one waiting call.
    pub fn queue_with_calls(&self) -> Vec<&SkillQueueRecord> {
        self.queue
            .iter()
            .filter(|skill| skill.calls_in_queue != 0)
            .collect()
    }

    /// Banner text shown while calls are waiting.
    pub fn notification(&self) -> Option<String> {
        (self.total_calls_in_queue > 0).then(|| {
            format!(
                "Warning: {} calls in queue! Click 'View Queue' for details.",
                self.total_calls_in_queue
            )
        })
    }
}
