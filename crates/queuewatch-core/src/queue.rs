use serde::{Deserialize, Serialize};

/// Service level below this percentage flags a dashboard row.
pub const SERVICE_LEVEL_TARGET: f64 = 80.0;

/// Queue state for one registry skill. Always present for every known skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillQueueRecord {
    pub skill_id: String,
    pub skill_name: String,
    pub calls_in_queue: u32,
    pub oldest_call: String,
    pub staffed: u32,
    pub available: u32,
    pub rt_sl: String,
}

impl SkillQueueRecord {
    /// Placeholder for a skill the report did not mention.
    pub fn idle(skill_id: &str, skill_name: &str) -> Self {
        Self {
            skill_id: skill_id.to_string(),
            skill_name: skill_name.to_string(),
            calls_in_queue: 0,
            oldest_call: "00:00".to_string(),
            staffed: 0,
            available: 0,
            rt_sl: "100.00%".to_string(),
        }
    }
}

/// Row highlight for the queue dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningClass {
    #[serde(rename = "both-warning")]
    Both,
    #[serde(rename = "calls-warning")]
    Calls,
    #[serde(rename = "sl-warning")]
    ServiceLevel,
    #[serde(rename = "normal-row")]
    Normal,
    #[serde(rename = "alternate-row")]
    Alternate,
}

impl WarningClass {
    /// Classify a row. `quiet_position` counts the non-warning rows emitted
    /// before this one and only matters when neither flag is set.
    pub fn classify(has_calls: bool, low_service_level: bool, quiet_position: usize) -> Self {
        match (has_calls, low_service_level) {
            (true, true) => Self::Both,
            (true, false) => Self::Calls,
            (false, true) => Self::ServiceLevel,
            (false, false) if quiet_position % 2 == 0 => Self::Normal,
            (false, false) => Self::Alternate,
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, Self::Both | Self::Calls | Self::ServiceLevel)
    }
}

/// Full per-skill metrics as shown on the queue dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDashboardRecord {
    /// `"<name> (<id>)"`
    pub skill_name: String,
    pub calls_in_queue: String,
    pub offered: String,
    pub answered: String,
    pub transfers: String,
    pub true_abn: String,
    pub short_abn: String,
    pub oldest_call: String,
    pub max_delay: String,
    pub asa: String,
    pub aqt: String,
    pub service_level: String,
    pub rt_sl: String,
    pub staffed: String,
    pub available: String,
    pub acw: String,
    pub acd: String,
    pub aux: String,
    pub other: String,
    pub row_class: WarningClass,
}

/// True when the text is a non-empty run of ASCII digits.
pub fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a percentage cell such as `75.5%`. Unparsable text counts as 0.
pub fn parse_percentage(text: &str) -> f64 {
    text.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_matrix() {
        assert_eq!(WarningClass::classify(true, true, 0), WarningClass::Both);
        assert_eq!(WarningClass::classify(true, false, 0), WarningClass::Calls);
        assert_eq!(
            WarningClass::classify(false, true, 0),
            WarningClass::ServiceLevel
        );
        assert_eq!(WarningClass::classify(false, false, 0), WarningClass::Normal);
        assert_eq!(
            WarningClass::classify(false, false, 1),
            WarningClass::Alternate
        );
    }

    #[test]
    fn digits() {
        assert!(is_all_digits("12"));
        assert!(is_all_digits("0"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("-1"));
        assert!(!is_all_digits("1.5"));
        assert!(!is_all_digits(" 3"));
    }

    #[test]
    fn percentages() {
        assert!((parse_percentage("75.5%") - 75.5).abs() < f64::EPSILON);
        assert!((parse_percentage("100.00%") - 100.0).abs() < f64::EPSILON);
        assert!((parse_percentage("95") - 95.0).abs() < f64::EPSILON);
        assert_eq!(parse_percentage(""), 0.0);
        assert_eq!(parse_percentage("n/a"), 0.0);
    }

    #[test]
    fn idle_record_defaults() {
        let rec = SkillQueueRecord::idle("1400", "Levis EN (1400)");
        assert_eq!(rec.calls_in_queue, 0);
        assert_eq!(rec.oldest_call, "00:00");
        assert_eq!(rec.rt_sl, "100.00%");
        assert_eq!(rec.staffed, 0);
        assert_eq!(rec.available, 0);
    }

    #[test]
    fn warning_serializes_as_css_names() {
        assert_eq!(
            serde_json::to_string(&WarningClass::ServiceLevel).unwrap(),
            "\"sl-warning\""
        );
    }
}
