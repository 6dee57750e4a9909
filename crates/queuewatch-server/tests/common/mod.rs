use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;

use queuewatch_report::test_helpers::{agent_row, report_html, skill_row};

use queuewatch_server::config::ServerConfig;
use queuewatch_server::{build_app, spawn_session_reaper};

/// Report served by default: 12 calls waiting on Levis EN, one agent on a
/// long call, one on chat.
pub fn fixture_report() -> String {
    report_html(
        &[
            skill_row("Levis EN", "1400", "12", "75.5%"),
            skill_row("Levis FR", "1401", "0", "95%"),
        ],
        &[
            agent_row("5001", "Ana Ruiz", "ACD", "", "0:06:40", "0:06:40"),
            agent_row("5002", "Ben Ode", "AUX", "CHAT", "", "12:00"),
            agent_row("5003", "Cy Park", "ACW", "", "", "00:30"),
        ],
    )
}

/// Stand-in for the upstream report endpoint.
pub struct Upstream {
    pub addr: SocketAddr,
    body: Arc<Mutex<String>>,
    failing: Arc<AtomicBool>,
    _task: tokio::task::JoinHandle<()>,
}

impl Upstream {
    pub async fn start(body: String) -> Self {
        let body = Arc::new(Mutex::new(body));
        let failing = Arc::new(AtomicBool::new(false));

        let app = {
            let body = Arc::clone(&body);
            let failing = Arc::clone(&failing);
            Router::new().route(
                "/report",
                post(move || {
                    let body = Arc::clone(&body);
                    let failing = Arc::clone(&failing);
                    async move {
                        if failing.load(Ordering::SeqCst) {
                            return StatusCode::BAD_GATEWAY.into_response();
                        }
                        let markup = body.lock().unwrap().clone();
                        markup.into_response()
                    }
                }),
            )
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            body,
            failing,
            _task: task,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/report", self.addr)
    }

    pub fn set_body(&self, body: String) {
        *self.body.lock().unwrap() = body;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server polling `upstream` once per hour, so each session sees
    /// exactly its initial refresh.
    pub async fn new(upstream: &Upstream) -> Self {
        Self::from_config(Self::config_for(upstream)).await
    }

    /// Start a server with a session cap.
    pub async fn with_max_sessions(upstream: &Upstream, max_sessions: usize) -> Self {
        let mut config = Self::config_for(upstream);
        config.limits.max_sessions = max_sessions;
        Self::from_config(config).await
    }

    /// Start a server that re-polls `upstream` every second.
    pub async fn fast_polling(upstream: &Upstream) -> Self {
        let mut config = Self::config_for(upstream);
        config.report.poll_interval_secs = 1;
        Self::from_config(config).await
    }

    pub fn config_for(upstream: &Upstream) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.report.url = upstream.url();
        config.report.poll_interval_secs = 3600;
        config.report.timeout_secs = 2;
        config
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, state) = build_app(config).unwrap();
        spawn_session_reaper(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url())
    }
}

/// Call the overview without a cookie and return the `session_id=...` pair
/// the server hands back.
pub async fn open_session(server: &TestServer) -> String {
    let resp = reqwest::get(server.api("/overview")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .expect("new session sets a cookie")
        .to_str()
        .unwrap()
        .to_string();
    set_cookie.split(';').next().unwrap().to_string()
}

/// GET an API path with the session cookie attached.
pub async fn get_with_session(server: &TestServer, cookie: &str, path: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(server.api(path))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap()
}

/// Poll the overview until the session's first refresh has been published.
pub async fn wait_for_refresh(server: &TestServer, cookie: &str) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let body: serde_json::Value = get_with_session(server, cookie, "/overview")
                .await
                .json()
                .await
                .unwrap();
            if !body["refreshed_at"].is_null() {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Timed out waiting for the first refresh")
}

/// Open a session and wait for its first snapshot.
pub async fn refreshed_session(server: &TestServer) -> String {
    let cookie = open_session(server).await;
    wait_for_refresh(server, &cookie).await;
    cookie
}
