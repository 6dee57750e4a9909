use serde::Deserialize;

use queuewatch_core::alerts::AlertThresholds;
use queuewatch_report::ReportConfig;

/// Top-level server configuration, loaded from `queuewatch.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub report: ReportConfig,
    /// Thresholds every new session starts with.
    pub thresholds: AlertThresholds,
    pub limits: LimitsConfig,
    pub sessions: SessionsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            web_root: "web".to_string(),
            report: ReportConfig::default(),
            thresholds: AlertThresholds::default(),
            limits: LimitsConfig::default(),
            sessions: SessionsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum concurrent viewer sessions, each with its own refresh loop.
    pub max_sessions: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_sessions: 500 }
    }
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub idle_timeout_secs: u64,
    pub idle_check_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            idle_check_interval_secs: 60,
        }
    }
}

impl ServerConfig {
    /// First configuration problem that makes the server unable to run.
    pub fn check(&self) -> Result<(), String> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        if !(self.report.url.starts_with("http://") || self.report.url.starts_with("https://")) {
            return Err(format!("report.url {:?} is not an http(s) URL", self.report.url));
        }
        if self.report.poll_interval_secs == 0 {
            return Err("report.poll_interval_secs must be > 0".to_string());
        }
        if self.report.timeout_secs == 0 {
            return Err("report.timeout_secs must be > 0".to_string());
        }
        if self.limits.max_sessions == 0 {
            return Err("limits.max_sessions must be > 0".to_string());
        }
        if self.sessions.idle_timeout_secs == 0 {
            return Err("sessions.idle_timeout_secs must be > 0".to_string());
        }
        if self.sessions.idle_check_interval_secs == 0 {
            return Err("sessions.idle_check_interval_secs must be > 0".to_string());
        }
        Ok(())
    }

    /// Validate configuration, logging warnings for issues. Exits the process
    /// on a configuration the server cannot run with.
    pub fn validate(&self) {
        if let Err(reason) = self.check() {
            tracing::error!("{reason}");
            std::process::exit(1);
        }

        match self.report.cookie {
            None => tracing::warn!(
                "No report cookie configured; the report endpoint will likely reject requests"
            ),
            Some(_) if std::env::var("QUEUEWATCH_REPORT_COOKIE").is_err() => tracing::warn!(
                "report.cookie is set in config file, use QUEUEWATCH_REPORT_COOKIE env var in production"
            ),
            Some(_) => {},
        }

        if self.report.timeout_secs >= self.report.poll_interval_secs {
            tracing::warn!(
                timeout_secs = self.report.timeout_secs,
                poll_interval_secs = self.report.poll_interval_secs,
                "Report timeout is not shorter than the poll interval"
            );
        }
    }

    /// Load config from `queuewatch.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("queuewatch.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from queuewatch.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse queuewatch.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No queuewatch.toml found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = var("QUEUEWATCH_LISTEN_ADDR")
            && !addr.is_empty()
        {
            self.listen_addr = addr;
        }
        if let Some(root) = var("QUEUEWATCH_WEB_ROOT")
            && !root.is_empty()
        {
            self.web_root = root;
        }
        if let Some(url) = var("QUEUEWATCH_REPORT_URL")
            && !url.is_empty()
        {
            self.report.url = url;
        }
        if let Some(cookie) = var("QUEUEWATCH_REPORT_COOKIE")
            && !cookie.is_empty()
        {
            self.report.cookie = Some(cookie);
        }
        if let Some(val) = var("QUEUEWATCH_POLL_INTERVAL_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            self.report.poll_interval_secs = n;
        }
        if let Some(val) = var("QUEUEWATCH_MAX_SESSIONS")
            && let Ok(n) = val.parse::<usize>()
        {
            self.limits.max_sessions = n;
        }
    }
}
