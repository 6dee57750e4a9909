pub mod agent;
pub mod alerts;
pub mod queue;
pub mod skills;
pub mod snapshot;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::agent::{AgentRecord, RowClass, StateClass};
    use crate::alerts::{AlertEntry, AlertKind, AuxEntry};
    use crate::queue::SkillQueueRecord;
    use crate::skills::SKILLS;
    use crate::snapshot::ViewerSnapshot;
    use crate::time::to_seconds;

    /// Create an agent record with the given state fields.
    pub fn make_agent(
        avaya_id: &str,
        state: &str,
        reason_code: &str,
        call_duration: &str,
        time_in_state: &str,
    ) -> AgentRecord {
        AgentRecord {
            avaya_id: avaya_id.to_string(),
            full_name: format!("Agent {avaya_id}"),
            state: state.to_string(),
            state_class: StateClass::from_state(state),
            reason_code: reason_code.to_string(),
            active_call: String::new(),
            call_duration: call_duration.to_string(),
            call_duration_secs: to_seconds(call_duration),
            skill_name: "Levis EN".to_string(),
            time_in_state: time_in_state.to_string(),
            time_in_state_secs: to_seconds(time_in_state),
            row_class: RowClass::Normal,
        }
    }

    /// Zero-filled queue list for the whole registry, sorted by name.
    pub fn idle_queue() -> Vec<SkillQueueRecord> {
        let mut queue: Vec<SkillQueueRecord> = SKILLS
            .iter()
            .map(|(id, name)| SkillQueueRecord::idle(id, name))
            .collect();
        queue.sort_by(|a, b| a.skill_name.cmp(&b.skill_name));
        queue
    }

    /// A small, internally consistent snapshot: one agent on a long call,
    /// one on chat, and 2 calls waiting on `1400`.
    pub fn sample_snapshot() -> ViewerSnapshot {
        let mut queue = idle_queue();
        if let Some(skill) = queue.iter_mut().find(|s| s.skill_id == "1400") {
            skill.calls_in_queue = 2;
        }
        ViewerSnapshot {
            agents: vec![
                make_agent("5001", "ACD", "", "07:00", "07:00"),
                make_agent("5002", "AUX", "CHAT", "", "12:00"),
            ],
            alerts: vec![AlertEntry {
                kind: AlertKind::LongCall,
                avaya_id: "5001".to_string(),
                full_name: "Agent 5001".to_string(),
                duration: "07:00".to_string(),
            }],
            aux: vec![AuxEntry {
                reason_code: "CHAT".to_string(),
                avaya_id: "5002".to_string(),
                full_name: "Agent 5002".to_string(),
                time_in_state: "12:00".to_string(),
            }],
            queue,
            dashboard: Vec::new(),
            total_calls_in_queue: 2,
            refreshed_at: Some("1760000000Z".to_string()),
        }
    }
}
