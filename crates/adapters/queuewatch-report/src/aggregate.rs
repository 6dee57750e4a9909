use std::collections::HashSet;

use queuewatch_core::queue::{
    SERVICE_LEVEL_TARGET, SkillDashboardRecord, SkillQueueRecord, WarningClass, is_all_digits,
    parse_percentage,
};
use queuewatch_core::skills::{SKILLS, skill_name};

use crate::extract::{DashboardRow, QueueRow};

/// Queue-side output of one refresh cycle.
#[derive(Debug, Default)]
pub struct QueueSummary {
    /// One record per registry skill, sorted by skill name.
    pub skills: Vec<SkillQueueRecord>,
    pub total_calls_in_queue: u64,
}

/// Build the zero-filled queue list.
///
/// Rows for unknown skills and rows whose calls cell is not a plain count
/// (or does not fit a `u32`) are dropped; the first row seen for a skill
/// wins. Every registry skill without a usable row gets an idle placeholder.
/// The total is a `u64`, so it always equals the sum of the per-skill counts.
pub fn build_queue(rows: &[QueueRow]) -> QueueSummary {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut skills = Vec::with_capacity(SKILLS.len());
    let mut total: u64 = 0;

    for row in rows {
        let Some(name) = skill_name(&row.skill_id) else {
            continue;
        };
        if !is_all_digits(&row.calls_in_queue) {
            tracing::debug!(skill_id = %row.skill_id, calls = %row.calls_in_queue, "Ignoring non-numeric queue count");
            continue;
        }
        let Ok(calls) = row.calls_in_queue.parse::<u32>() else {
            tracing::debug!(skill_id = %row.skill_id, calls = %row.calls_in_queue, "Ignoring out-of-range queue count");
            continue;
        };
        if !seen.insert(row.skill_id.as_str()) {
            continue;
        }

        total += u64::from(calls);
        skills.push(SkillQueueRecord {
            skill_id: row.skill_id.clone(),
            skill_name: name.to_string(),
            calls_in_queue: calls,
            oldest_call: row.oldest_call.clone(),
            staffed: parse_count(&row.staffed),
            available: parse_count(&row.available),
            rt_sl: row.rt_sl.clone(),
        });
    }

    for (skill_id, name) in SKILLS {
        if !seen.contains(skill_id) {
            skills.push(SkillQueueRecord::idle(skill_id, name));
        }
    }

    skills.sort_by(|a, b| a.skill_name.cmp(&b.skill_name));

    QueueSummary {
        skills,
        total_calls_in_queue: total,
    }
}

/// Build dashboard records for the skills present in the report.
pub fn build_dashboard(rows: &[DashboardRow]) -> Vec<SkillDashboardRecord> {
    let mut quiet_rows = 0;
    rows.iter()
        .map(|row| {
            let has_calls = is_all_digits(&row.calls_in_queue)
                && row.calls_in_queue.bytes().any(|b| b != b'0');
            let low_service_level = parse_percentage(&row.service_level) < SERVICE_LEVEL_TARGET;
            let row_class = WarningClass::classify(has_calls, low_service_level, quiet_rows);
            if !row_class.is_warning() {
                quiet_rows += 1;
            }

            SkillDashboardRecord {
                skill_name: format!("{} ({})", row.skill_name, row.skill_id),
                calls_in_queue: row.calls_in_queue.clone(),
                offered: row.offered.clone(),
                answered: row.answered.clone(),
                transfers: row.transfers.clone(),
                true_abn: row.true_abn.clone(),
                short_abn: row.short_abn.clone(),
                oldest_call: row.oldest_call.clone(),
                max_delay: row.max_delay.clone(),
                asa: row.asa.clone(),
                aqt: row.aqt.clone(),
                service_level: row.service_level.clone(),
                rt_sl: row.rt_sl.clone(),
                staffed: row.staffed.clone(),
                available: row.available.clone(),
                acw: row.acw.clone(),
                acd: row.acd.clone(),
                aux: row.aux.clone(),
                other: row.other.clone(),
                row_class,
            }
        })
        .collect()
}

/// Staffing counts are display cells; anything unreadable shows as 0.
fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}
