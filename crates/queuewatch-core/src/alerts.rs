use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Alert kinds, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "Long Call")]
    LongCall,
    #[serde(rename = "Extended Lunch")]
    ExtendedLunch,
    #[serde(rename = "Long ACW")]
    LongAcw,
    #[serde(rename = "Extended Break")]
    ExtendedBreak,
    #[serde(rename = "IT Issue")]
    ItIssue,
    #[serde(rename = "Default Detected")]
    DefaultDetected,
    #[serde(rename = "Long Hold")]
    LongHold,
}

impl AlertKind {
    pub const ALL: [AlertKind; 7] = [
        AlertKind::LongCall,
        AlertKind::ExtendedLunch,
        AlertKind::LongAcw,
        AlertKind::ExtendedBreak,
        AlertKind::ItIssue,
        AlertKind::DefaultDetected,
        AlertKind::LongHold,
    ];

    /// Display name, also the key used by the settings form.
    pub fn name(self) -> &'static str {
        match self {
            Self::LongCall => "Long Call",
            Self::ExtendedLunch => "Extended Lunch",
            Self::LongAcw => "Long ACW",
            Self::ExtendedBreak => "Extended Break",
            Self::ItIssue => "IT Issue",
            Self::DefaultDetected => "Default Detected",
            Self::LongHold => "Long Hold",
        }
    }

    /// Long Call reports the call duration; every other kind reports time in state.
    pub fn reports_call_duration(self) -> bool {
        self.name().contains("Call")
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One alert raised for one agent in one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub kind: AlertKind,
    pub avaya_id: String,
    pub full_name: String,
    /// Call duration for Long Call, time in state otherwise.
    pub duration: String,
}

/// An agent sitting in one of the tracked AUX reason codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxEntry {
    pub reason_code: String,
    pub avaya_id: String,
    pub full_name: String,
    pub time_in_state: String,
}

/// Rejected settings submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {name}")]
pub struct InvalidThresholdInput {
    pub name: &'static str,
    pub value: String,
}

/// Per-viewer alert thresholds in seconds.
///
/// Serialized with the display names as keys so the settings view and the
/// config file speak the same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    #[serde(rename = "Long Call", alias = "long_call")]
    pub long_call: u64,
    #[serde(rename = "Extended Lunch", alias = "extended_lunch")]
    pub extended_lunch: u64,
    #[serde(rename = "Long ACW", alias = "long_acw")]
    pub long_acw: u64,
    #[serde(rename = "Extended Break", alias = "extended_break")]
    pub extended_break: u64,
    #[serde(rename = "IT Issue", alias = "it_issue")]
    pub it_issue: u64,
    #[serde(rename = "Long Hold", alias = "long_hold")]
    pub long_hold: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            long_call: 360,
            extended_lunch: 3600,
            long_acw: 120,
            extended_break: 900,
            it_issue: 30,
            long_hold: 120,
        }
    }
}

impl AlertThresholds {
    /// Threshold for a kind. `Default Detected` is not time-gated.
    pub fn get(&self, kind: AlertKind) -> Option<u64> {
        match kind {
            AlertKind::LongCall => Some(self.long_call),
            AlertKind::ExtendedLunch => Some(self.extended_lunch),
            AlertKind::LongAcw => Some(self.long_acw),
            AlertKind::ExtendedBreak => Some(self.extended_break),
            AlertKind::ItIssue => Some(self.it_issue),
            AlertKind::DefaultDetected => None,
            AlertKind::LongHold => Some(self.long_hold),
        }
    }

    fn slot_mut(&mut self, kind: AlertKind) -> Option<&mut u64> {
        match kind {
            AlertKind::LongCall => Some(&mut self.long_call),
            AlertKind::ExtendedLunch => Some(&mut self.extended_lunch),
            AlertKind::LongAcw => Some(&mut self.long_acw),
            AlertKind::ExtendedBreak => Some(&mut self.extended_break),
            AlertKind::ItIssue => Some(&mut self.it_issue),
            AlertKind::DefaultDetected => None,
            AlertKind::LongHold => Some(&mut self.long_hold),
        }
    }

    /// Gated kinds with their current values, in evaluation order.
    pub fn entries(&self) -> Vec<(AlertKind, u64)> {
        AlertKind::ALL
            .iter()
            .filter_map(|&kind| self.get(kind).map(|secs| (kind, secs)))
            .collect()
    }

    /// Apply a settings form keyed by display name.
    ///
    /// Every submitted value is validated before any is stored, so a
    /// rejected submission leaves all thresholds untouched. Keys that are
    /// missing keep their current value; unknown keys are ignored.
    pub fn apply_form(&mut self, form: &HashMap<String, String>) -> Result<(), InvalidThresholdInput> {
        let mut updated = *self;
        for kind in AlertKind::ALL {
            let Some(raw) = form.get(kind.name()) else {
                continue;
            };
            let Some(slot) = updated.slot_mut(kind) else {
                continue;
            };
            *slot = raw.trim().parse::<u64>().map_err(|_| InvalidThresholdInput {
                name: kind.name(),
                value: raw.clone(),
            })?;
        }
        *self = updated;
        Ok(())
    }
}
