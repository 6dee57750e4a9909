use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use queuewatch_core::skills::{is_known_skill, parse_skill_id};

use crate::schema::{ColumnSchema, MalformedRow};

static DATA_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.data"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static SKILL_ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector(r#"td.nowrap[colspan="3"]"#));
static STRONG: LazyLock<Selector> = LazyLock::new(|| selector("strong"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Dashboard extraction ignores this many leading data rows (report headers).
const DASHBOARD_SKIP_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentField {
    AvayaId,
    FullName,
    State,
    ReasonCode,
    ActiveCall,
    CallDuration,
    SkillName,
    TimeInState,
}

pub static AGENT_LAYOUT: ColumnSchema<AgentField> = ColumnSchema::new(
    "agent",
    &[
        (AgentField::AvayaId, 0),
        (AgentField::FullName, 1),
        (AgentField::State, 2),
        (AgentField::ReasonCode, 3),
        (AgentField::ActiveCall, 4),
        (AgentField::CallDuration, 5),
        (AgentField::SkillName, 6),
        (AgentField::TimeInState, 7),
    ],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueField {
    CallsInQueue,
    OldestCall,
    Staffed,
    Available,
    RtSl,
}

/// Offsets count `td` siblings after the skill anchor cell, starting at 0
/// for the anchor's immediate neighbour.
pub static QUEUE_LAYOUT: ColumnSchema<QueueField> = ColumnSchema::new(
    "queue",
    &[
        (QueueField::CallsInQueue, 0),
        (QueueField::OldestCall, 7),
        (QueueField::Staffed, 12),
        (QueueField::Available, 13),
        (QueueField::RtSl, 15),
    ],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardField {
    Skill,
    CallsInQueue,
    Offered,
    Answered,
    Transfers,
    TrueAbn,
    ShortAbn,
    OldestCall,
    MaxDelay,
    Asa,
    Aqt,
    ServiceLevel,
    RtSl,
    Staffed,
    Available,
    Acw,
    Acd,
    Aux,
    Other,
}

pub static DASHBOARD_LAYOUT: ColumnSchema<DashboardField> = ColumnSchema::new(
    "dashboard",
    &[
        (DashboardField::Skill, 0),
        (DashboardField::CallsInQueue, 1),
        (DashboardField::Offered, 2),
        (DashboardField::Answered, 3),
        (DashboardField::Transfers, 4),
        (DashboardField::TrueAbn, 5),
        (DashboardField::ShortAbn, 6),
        (DashboardField::OldestCall, 7),
        (DashboardField::MaxDelay, 8),
        (DashboardField::Asa, 9),
        (DashboardField::Aqt, 10),
        (DashboardField::ServiceLevel, 11),
        (DashboardField::RtSl, 12),
        (DashboardField::Staffed, 13),
        (DashboardField::Available, 14),
        (DashboardField::Acw, 15),
        (DashboardField::Acd, 16),
        (DashboardField::Aux, 17),
        (DashboardField::Other, 18),
    ],
);

/// Raw agent cells, trimmed but otherwise as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRow {
    pub avaya_id: String,
    pub full_name: String,
    pub state: String,
    pub reason_code: String,
    pub active_call: String,
    pub call_duration: String,
    pub skill_name: String,
    pub time_in_state: String,
}

/// Raw queue cells for a registry skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRow {
    pub skill_id: String,
    pub calls_in_queue: String,
    pub oldest_call: String,
    pub staffed: String,
    pub available: String,
    pub rt_sl: String,
}

/// Raw dashboard cells for one skill summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub skill_name: String,
    pub skill_id: String,
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
}

/// Parsed report markup.
pub struct ReportDocument {
    html: Html,
}

impl ReportDocument {
    /// Parse report markup. The endpoint answers with bare `<tr>` fragments,
    /// which an HTML5 tree builder drops outside a table, so the markup is
    /// always wrapped. A `<table>` start tag inside it closes the wrapper, so
    /// complete tables parse the same either way.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(&format!("<table>{markup}</table>")),
        }
    }

    fn data_rows(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.select(&DATA_ROW)
    }

    /// Rows with at least the eight agent columns. Skill summary rows (those
    /// carrying a skill anchor cell) are not agents.
    pub fn agent_rows(&self) -> Vec<AgentRow> {
        self.data_rows()
            // Stricter than width alone: a 19-cell skill row would otherwise
            // pass as an agent named after its queue counters.
            .filter(|row| row.select(&SKILL_ANCHOR).next().is_none())
            .filter_map(|row| {
                let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
                let bound = AGENT_LAYOUT.bind(&cells).ok()?;
                Some(AgentRow {
                    avaya_id: bound.owned(AgentField::AvayaId),
                    full_name: bound.owned(AgentField::FullName),
                    state: bound.owned(AgentField::State),
                    reason_code: bound.owned(AgentField::ReasonCode),
                    active_call: bound.owned(AgentField::ActiveCall),
                    call_duration: bound.owned(AgentField::CallDuration),
                    skill_name: bound.owned(AgentField::SkillName),
                    time_in_state: bound.owned(AgentField::TimeInState),
                })
            })
            .collect()
    }

    /// Queue rows for registry skills, located through the skill anchor cell
    /// and read by sibling offset.
    pub fn queue_rows(&self) -> Vec<QueueRow> {
        let mut rows = Vec::new();
        for row in self.data_rows() {
            let Some(anchor) = row.select(&SKILL_ANCHOR).next() else {
                continue;
            };
            let label = stripped_text(anchor);
            if label.contains("Skill Name") || !(label.contains('(') && label.contains(')')) {
                continue;
            }
            let skill_id = parse_skill_id(&label);
            if !is_known_skill(skill_id) {
                continue;
            }

            let siblings: Vec<String> = anchor
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().name() == "td")
                .map(stripped_text)
                .collect();
            let bound = match QUEUE_LAYOUT.bind(&siblings) {
                Ok(bound) => bound,
                Err(e) => {
                    tracing::debug!(skill_id, error = %e, "Skipping queue row");
                    continue;
                },
            };

            rows.push(QueueRow {
                skill_id: skill_id.to_string(),
                calls_in_queue: bound.owned(QueueField::CallsInQueue),
                oldest_call: bound.owned(QueueField::OldestCall),
                staffed: bound.owned(QueueField::Staffed),
                available: bound.owned(QueueField::Available),
                rt_sl: bound.owned(QueueField::RtSl),
            });
        }
        rows
    }

    /// Skill summary rows for the dashboard, addressed purely by column.
    pub fn dashboard_rows(&self) -> Vec<DashboardRow> {
        self.data_rows()
            .skip(DASHBOARD_SKIP_ROWS)
            .filter_map(|row| match dashboard_row(row) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping dashboard row");
                    None
                },
            })
            .collect()
    }
}

fn dashboard_row(row: ElementRef<'_>) -> Result<DashboardRow, MalformedRow> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    let texts: Vec<String> = cells.iter().copied().map(cell_text).collect();
    let bound = DASHBOARD_LAYOUT.bind(&texts)?;

    let strong = cells
        .first()
        .and_then(|first| first.select(&STRONG).next())
        .ok_or(MalformedRow::MissingMarker {
            layout: DASHBOARD_LAYOUT.name(),
            marker: "strong",
        })?;

    Ok(DashboardRow {
        skill_name: cell_text(strong),
        skill_id: parse_skill_id(bound.get(DashboardField::Skill)).to_string(),
        calls_in_queue: bound.owned(DashboardField::CallsInQueue),
        offered: bound.owned(DashboardField::Offered),
        answered: bound.owned(DashboardField::Answered),
        transfers: bound.owned(DashboardField::Transfers),
        true_abn: bound.owned(DashboardField::TrueAbn),
        short_abn: bound.owned(DashboardField::ShortAbn),
        oldest_call: bound.owned(DashboardField::OldestCall),
        max_delay: bound.owned(DashboardField::MaxDelay),
        asa: bound.owned(DashboardField::Asa),
        aqt: bound.owned(DashboardField::Aqt),
        service_level: bound.owned(DashboardField::ServiceLevel),
        rt_sl: bound.owned(DashboardField::RtSl),
        staffed: bound.owned(DashboardField::Staffed),
        available: bound.owned(DashboardField::Available),
        acw: bound.owned(DashboardField::Acw),
        acd: bound.owned(DashboardField::Acd),
        aux: bound.owned(DashboardField::Aux),
        other: bound.owned(DashboardField::Other),
    })
}

/// All descendant text, trimmed at the ends.
fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Each descendant text node trimmed, empty ones dropped, then joined.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}
