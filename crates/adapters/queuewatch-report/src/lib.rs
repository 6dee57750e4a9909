pub mod aggregate;
pub mod classify;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod schema;
pub mod viewer;

pub use config::{ReportConfig, ReportQuery};
pub use fetcher::{FetchError, ReportFetcher};
pub use viewer::{ViewerHandle, spawn_viewer};

use queuewatch_core::alerts::AlertThresholds;
use queuewatch_core::snapshot::ViewerSnapshot;
use queuewatch_core::time::timestamp_now;

use extract::ReportDocument;

/// Run one report body through extraction, classification, and aggregation.
pub fn build_snapshot(markup: &str, thresholds: &AlertThresholds) -> ViewerSnapshot {
    let doc = ReportDocument::parse(markup);
    let agents = classify::classify_agents(&doc.agent_rows(), thresholds);
    let queue = aggregate::build_queue(&doc.queue_rows());
    let dashboard = aggregate::build_dashboard(&doc.dashboard_rows());

    ViewerSnapshot {
        agents: agents.agents,
        alerts: agents.alerts,
        aux: agents.aux,
        queue: queue.skills,
        dashboard,
        total_calls_in_queue: queue.total_calls_in_queue,
        refreshed_at: Some(timestamp_now()),
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    /// One agent row as the report renders it (nine cells, the last unused).
    pub fn agent_row(
        avaya_id: &str,
        full_name: &str,
        state: &str,
        reason_code: &str,
        call_duration: &str,
        time_in_state: &str,
    ) -> String {
        let active_call = if call_duration.is_empty() { "" } else { "Inbound" };
        format!(
            r#"<tr class="data"><td>{avaya_id}</td><td>{full_name}</td><td>{state}</td><td>{reason_code}</td><td>{active_call}</td><td>{call_duration}</td><td>Levis EN</td><td>{time_in_state}</td><td></td></tr>"#
        )
    }

    /// A skill summary row: the anchor cell holding `label_html`, followed by
    /// one `td` per entry in `cells`.
    pub fn skill_row_cells(label_html: &str, cells: &[&str]) -> String {
        let tail: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!(r#"<tr class="data"><td colspan="3" class="nowrap">{label_html}</td>{tail}</tr>"#)
    }

    /// A fully populated 19-cell skill row with typical values.
    pub fn skill_row(name: &str, skill_id: &str, calls: &str, service_level: &str) -> String {
        skill_row_cells(
            &format!("<strong>{name}</strong> ({skill_id})"),
            &[
                calls,
                "10",
                "9",
                "0",
                "1",
                "0",
                "00:45",
                "01:10",
                "00:12",
                "00:30",
                service_level,
                "88.00%",
                "5",
                "2",
                "1",
                "2",
                "0",
                "0",
            ],
        )
    }

    /// The column header and totals rows that open the skill table.
    pub fn header_rows() -> String {
        let header = skill_row_cells(
            "Skill Name",
            &[
                "Calls", "Offered", "Answered", "Transfers", "True ABN", "Short ABN", "Oldest",
                "Max Delay", "ASA", "AQT", "SL", "RT SL", "Staffed", "Avail", "ACW", "ACD",
                "AUX", "Other",
            ],
        );
        let totals = skill_row_cells("Totals", &["0"; 18]);
        format!("{header}{totals}")
    }

    /// A report body: the skill table (with its header rows) and then the
    /// agent table.
    pub fn report_html(skill_rows: &[String], agent_rows: &[String]) -> String {
        format!(
            "<table>{}{}</table><table>{}</table>",
            header_rows(),
            skill_rows.concat(),
            agent_rows.concat()
        )
    }
}
