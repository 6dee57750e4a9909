use serde::{Deserialize, Serialize};

/// Badge category derived from the agent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateClass {
    Acd,
    Aux,
    Acw,
    Other,
}

impl StateClass {
    /// Classify an upper-cased state string.
    pub fn from_state(state: &str) -> Self {
        match state {
            "ACD" => Self::Acd,
            "AUX" => Self::Aux,
            "ACW" => Self::Acw,
            s if s.contains("HOLD") => Self::Other,
            _ => Self::Other,
        }
    }
}

/// Alternating row shading for table views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowClass {
    #[serde(rename = "normal-row")]
    Normal,
    #[serde(rename = "alternate-row")]
    Alternate,
}

impl RowClass {
    /// Even positions are normal, odd positions alternate.
    pub fn for_position(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Normal
        } else {
            Self::Alternate
        }
    }
}

/// One agent as reported in a single refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub avaya_id: String,
    pub full_name: String,
    /// Upper-cased state text, e.g. `ACD` or `OTHER (HOLD)`.
    pub state: String,
    pub state_class: StateClass,
    /// Upper-cased reason code.
    pub reason_code: String,
    pub active_call: String,
    pub call_duration: String,
    pub call_duration_secs: u64,
    pub skill_name: String,
    pub time_in_state: String,
    pub time_in_state_secs: u64,
    pub row_class: RowClass,
}
