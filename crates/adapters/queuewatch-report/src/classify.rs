use queuewatch_core::agent::{AgentRecord, RowClass, StateClass};
use queuewatch_core::alerts::{AlertEntry, AlertKind, AlertThresholds, AuxEntry};
use queuewatch_core::time::to_seconds;

use crate::extract::AgentRow;

/// AUX reason codes listed on the AUX view.
pub const TRACKED_AUX_CODES: [&str; 11] = [
    "EMAIL 1",
    "EMAIL 2",
    "CSR LEVEL II",
    "QUALITY COACHING",
    "TL INTERN",
    "FLOOR SUPPORT",
    "CHAT",
    "BRAND SPECIALIST",
    "PERFORMANCE ANALYST",
    "BACK OFFICE",
    "TRAINING",
];

/// Agent-side output of one refresh cycle.
#[derive(Debug, Default)]
pub struct AgentClassification {
    pub agents: Vec<AgentRecord>,
    pub alerts: Vec<AlertEntry>,
    pub aux: Vec<AuxEntry>,
}

/// Turn extracted rows into records, AUX entries, and at most one alert per agent.
pub fn classify_agents(rows: &[AgentRow], thresholds: &AlertThresholds) -> AgentClassification {
    let mut out = AgentClassification::default();

    for (index, row) in rows.iter().enumerate() {
        let state = row.state.to_uppercase();
        let reason_code = row.reason_code.to_uppercase();
        let record = AgentRecord {
            avaya_id: row.avaya_id.clone(),
            full_name: row.full_name.clone(),
            state_class: StateClass::from_state(&state),
            state,
            reason_code,
            active_call: row.active_call.clone(),
            call_duration: row.call_duration.clone(),
            call_duration_secs: to_seconds(&row.call_duration),
            skill_name: row.skill_name.clone(),
            time_in_state: row.time_in_state.clone(),
            time_in_state_secs: to_seconds(&row.time_in_state),
            row_class: RowClass::for_position(index),
        };

        if record.state == "AUX" && TRACKED_AUX_CODES.contains(&record.reason_code.as_str()) {
            out.aux.push(AuxEntry {
                reason_code: record.reason_code.clone(),
                avaya_id: record.avaya_id.clone(),
                full_name: record.full_name.clone(),
                time_in_state: record.time_in_state.clone(),
            });
        }

        if let Some(kind) = evaluate_alert(&record, thresholds) {
            let duration = if kind.reports_call_duration() {
                &record.call_duration
            } else {
                &record.time_in_state
            };
            out.alerts.push(AlertEntry {
                kind,
                avaya_id: record.avaya_id.clone(),
                full_name: record.full_name.clone(),
                duration: duration.clone(),
            });
        }

        out.agents.push(record);
    }

    out
}

/// First matching alert rule for an agent. Rule order is significant: an
/// agent on a long call never also reports a later rule.
pub fn evaluate_alert(agent: &AgentRecord, thresholds: &AlertThresholds) -> Option<AlertKind> {
    let state = agent.state.as_str();
    let reason = agent.reason_code.as_str();
    let call = agent.call_duration_secs;
    let in_state = agent.time_in_state_secs;

    if state == "ACD" && call > thresholds.long_call {
        Some(AlertKind::LongCall)
    } else if reason.contains("LUNCH") && in_state > thresholds.extended_lunch {
        Some(AlertKind::ExtendedLunch)
    } else if state == "ACW" && in_state > thresholds.long_acw {
        Some(AlertKind::LongAcw)
    } else if state == "AUX" && reason.contains("BREAK") && in_state > thresholds.extended_break {
        Some(AlertKind::ExtendedBreak)
    } else if state == "AUX" && reason.contains("IT ISSUE") && in_state > thresholds.it_issue {
        Some(AlertKind::ItIssue)
    } else if state == "AUX" && reason.contains("DEFAULT") {
        Some(AlertKind::DefaultDetected)
    } else if state == "OTHER (HOLD)" && in_state > thresholds.long_hold {
        Some(AlertKind::LongHold)
    } else {
        None
    }
}
