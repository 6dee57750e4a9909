pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod session_store;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use queuewatch_report::FetchError;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> Result<(Router<()>, AppState), FetchError> {
    let web_root = config.web_root.clone();
    let state = AppState::new(config)?;

    // Snapshots change every cycle; never let a proxy hold one.
    let api_routes = Router::new()
        .route("/overview", get(api::overview))
        .route("/alerts", get(api::alerts))
        .route("/aux", get(api::aux))
        .route("/queue", get(api::queue))
        .route("/queue-dashboard", get(api::queue_dashboard))
        .route(
            "/settings",
            get(api::get_settings).post(api::update_settings),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .fallback_service(ServeDir::new(&web_root))
        .with_state(state.clone());

    Ok((app, state))
}

/// Background task that periodically evicts idle sessions, stopping their
/// refresh loops.
pub fn spawn_session_reaper(state: AppState) -> JoinHandle<()> {
    let max_idle = Duration::from_secs(state.config.sessions.idle_timeout_secs);
    let period = Duration::from_secs(state.config.sessions.idle_check_interval_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let (removed, remaining) = {
                let mut sessions = state.sessions.write().await;
                (sessions.cleanup_idle_sessions(max_idle), sessions.len())
            };
            if removed > 0 {
                tracing::info!(removed, remaining, "Evicted idle viewer sessions");
            }
        }
    })
}
