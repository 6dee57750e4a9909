use serde::{Deserialize, Serialize};

use queuewatch_core::skills::REPORT_SPLIT;

/// Default realtime management report endpoint.
pub const DEFAULT_REPORT_URL: &str =
    "https://reports.intouchcx.com/reports/lib/getRealtimeManagementFull.asp";

const DEFAULT_REFERER: &str = "https://reports.intouchcx.com/reports/custom/levis/realtimemanagementfull.asp?altSLThreshold=20&threshold=6";

/// Configuration for the upstream report poller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Endpoint receiving the report form POST.
    pub url: String,
    /// Raw `Cookie` header carrying the upstream session.
    pub cookie: Option<String>,
    /// `Referer` sent with each request.
    pub referer: String,
    /// Seconds between refresh cycles.
    pub poll_interval_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub query: ReportQuery,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REPORT_URL.to_string(),
            cookie: None,
            referer: DEFAULT_REFERER.to_string(),
            poll_interval_secs: 15,
            timeout_secs: 10,
            query: ReportQuery::default(),
        }
    }
}

/// Form payload posted to the report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportQuery {
    pub split: String,
    pub first_sort_col: String,
    pub first_sort_dir: String,
    pub second_sort_col: String,
    pub second_sort_dir: String,
    pub reason: String,
    pub state: String,
    pub timezone: String,
    #[serde(rename = "altSL")]
    pub alt_sl: String,
    pub threshold: String,
    #[serde(rename = "altSLThreshold")]
    pub alt_sl_threshold: String,
    pub acd_alert: String,
    pub acw_alert: String,
    pub hold_alert: String,
    pub sl_alert: String,
    pub asa_alert: String,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            split: REPORT_SPLIT.to_string(),
            first_sort_col: "FullName".to_string(),
            first_sort_dir: "ASC".to_string(),
            second_sort_col: "FullName".to_string(),
            second_sort_dir: "ASC".to_string(),
            reason: "all".to_string(),
            state: "all".to_string(),
            timezone: "0".to_string(),
            alt_sl: String::new(),
            threshold: "6".to_string(),
            alt_sl_threshold: "20".to_string(),
            acd_alert: String::new(),
            acw_alert: String::new(),
            hold_alert: String::new(),
            sl_alert: String::new(),
            asa_alert: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upstream_contract() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.url, DEFAULT_REPORT_URL);
        assert_eq!(cfg.poll_interval_secs, 15);
        assert_eq!(cfg.timeout_secs, 10);
        assert!(cfg.cookie.is_none());
        assert!(cfg.query.split.starts_with("1400,1401"));
    }

    #[test]
    fn query_field_names() {
        let table = toml::Value::try_from(ReportQuery::default()).unwrap();
        assert_eq!(table["firstSortCol"].as_str(), Some("FullName"));
        assert_eq!(table["secondSortDir"].as_str(), Some("ASC"));
        assert_eq!(table["altSL"].as_str(), Some(""));
        assert_eq!(table["altSLThreshold"].as_str(), Some("20"));
        assert_eq!(table["asaAlert"].as_str(), Some(""));
        assert_eq!(table["threshold"].as_str(), Some("6"));
    }

    #[test]
    fn parse_partial_toml() {
        let cfg: ReportConfig = toml::from_str(
            r#"
url = "http://127.0.0.1:9000/report"
poll_interval_secs = 30

[query]
threshold = "8"
"#,
        )
        .unwrap();
        assert_eq!(cfg.url, "http://127.0.0.1:9000/report");
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.query.threshold, "8");
        assert_eq!(cfg.query.first_sort_col, "FullName");
    }
}
