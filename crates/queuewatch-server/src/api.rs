use std::collections::HashMap;

use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use queuewatch_core::agent::AgentRecord;
use queuewatch_core::alerts::{AlertKind, AlertThresholds};
use queuewatch_core::queue::{SkillDashboardRecord, SkillQueueRecord};
use queuewatch_report::ViewerHandle;

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_id";

/// Value of the session cookie, if the request carries one.
pub fn session_id(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(Cookie::value)
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn invalid_session() -> AppError {
    AppError::BadRequest("Invalid session".to_string())
}

/// Resolve the caller's session, refreshing its idle timer.
async fn viewer(state: &AppState, jar: &CookieJar) -> Result<ViewerHandle, AppError> {
    let id = session_id(jar).ok_or_else(invalid_session)?;
    state
        .sessions
        .write()
        .await
        .get(id)
        .ok_or_else(invalid_session)
}

fn refresh_interval_ms(state: &AppState) -> u64 {
    state.config.report.poll_interval_secs.saturating_mul(1000)
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse<'a> {
    pub agents: &'a [AgentRecord],
    pub alert_count: usize,
    pub aux_count: usize,
    pub queue_count: u64,
    pub notification: Option<String>,
    pub refreshed_at: Option<&'a str>,
    pub refresh_interval_ms: u64,
}

/// GET /api/v1/overview: agent table and counters. Registers a session when
/// the caller has none.
pub async fn overview(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let existing = match session_id(&jar) {
        Some(id) => state.sessions.write().await.get(id),
        None => None,
    };

    let (viewer, jar) = match existing {
        Some(viewer) => (viewer, jar),
        None => {
            let (id, viewer) = state
                .sessions
                .write()
                .await
                .create(state.fetcher.clone(), state.config.thresholds)?;
            (viewer, jar.add(session_cookie(id)))
        },
    };

    let snapshot = viewer.snapshot();
    let body = Json(OverviewResponse {
        agents: &snapshot.agents,
        alert_count: snapshot.alert_count(),
        aux_count: snapshot.aux_count(),
        queue_count: snapshot.total_calls_in_queue,
        notification: snapshot.notification(),
        refreshed_at: snapshot.refreshed_at.as_deref(),
        refresh_interval_ms: refresh_interval_ms(&state),
    });
    Ok((jar, body).into_response())
}

#[derive(Debug, Serialize)]
pub struct AlertGroup {
    pub kind: AlertKind,
    pub agents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertGroup>,
}

/// GET /api/v1/alerts: active alerts grouped by kind.
pub async fn alerts(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AlertsResponse>, AppError> {
    let snapshot = viewer(&state, &jar).await?.snapshot();
    let alerts = snapshot
        .alerts_by_kind()
        .into_iter()
        .map(|(kind, agents)| AlertGroup { kind, agents })
        .collect();
    Ok(Json(AlertsResponse { alerts }))
}

#[derive(Debug, Serialize)]
pub struct AuxGroup {
    pub reason_code: String,
    pub agents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AuxResponse {
    pub aux: Vec<AuxGroup>,
}

/// GET /api/v1/aux: agents in tracked AUX codes, grouped by reason.
pub async fn aux(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AuxResponse>, AppError> {
    let snapshot = viewer(&state, &jar).await?.snapshot();
    let aux = snapshot
        .aux_by_reason()
        .into_iter()
        .map(|(reason_code, agents)| AuxGroup {
            reason_code,
            agents,
        })
        .collect();
    Ok(Json(AuxResponse { aux }))
}

#[derive(Debug, Serialize)]
pub struct QueueResponse<'a> {
    /// `None` when no skill has calls waiting.
    pub queue: Option<Vec<&'a SkillQueueRecord>>,
    pub total_calls_in_queue: u64,
}

/// GET /api/v1/queue: skills with calls waiting.
pub async fn queue(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let snapshot = viewer(&state, &jar).await?.snapshot();
    let waiting = snapshot.queue_with_calls();
    Ok(Json(QueueResponse {
        queue: (!waiting.is_empty()).then_some(waiting),
        total_calls_in_queue: snapshot.total_calls_in_queue,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub view: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub view: String,
    pub skills: &'a [SkillDashboardRecord],
    pub refreshed_at: Option<&'a str>,
    pub refresh_interval_ms: u64,
}

/// GET /api/v1/queue-dashboard: per-skill metrics with warning classes.
pub async fn queue_dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let snapshot = viewer(&state, &jar).await?.snapshot();
    Ok(Json(DashboardResponse {
        view: query.view.unwrap_or_else(|| "main".to_string()),
        skills: &snapshot.dashboard,
        refreshed_at: snapshot.refreshed_at.as_deref(),
        refresh_interval_ms: refresh_interval_ms(&state),
    })
    .into_response())
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub thresholds: AlertThresholds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /api/v1/settings: this session's alert thresholds.
pub async fn get_settings(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SettingsResponse>, AppError> {
    let viewer = viewer(&state, &jar).await?;
    Ok(Json(SettingsResponse {
        thresholds: viewer.thresholds(),
        message: None,
    }))
}

/// POST /api/v1/settings: replace thresholds from a form keyed by alert
/// name. Either every submitted value is applied or none is.
pub async fn update_settings(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<SettingsResponse>, AppError> {
    let viewer = viewer(&state, &jar).await?;
    let thresholds = viewer.update_thresholds(&form)?;
    tracing::debug!(?thresholds, "Alert thresholds updated");
    Ok(Json(SettingsResponse {
        thresholds,
        message: Some("Alert settings updated successfully"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;

    fn jar(cookies: &[&str]) -> CookieJar {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        CookieJar::from_headers(&map)
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let jar = jar(&["theme=dark; session_id=abc-123; lang=en"]);
        assert_eq!(session_id(&jar), Some("abc-123"));
    }

    #[test]
    fn finds_session_cookie_in_second_header() {
        let jar = jar(&["theme=dark", "session_id=xyz"]);
        assert_eq!(session_id(&jar), Some("xyz"));
    }

    #[test]
    fn missing_or_similar_names_are_ignored() {
        assert_eq!(session_id(&jar(&[])), None);
        assert_eq!(session_id(&jar(&["my_session_id=1; session=2"])), None);
    }

    #[test]
    fn issued_cookie_is_scoped_to_root() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
