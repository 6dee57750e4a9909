use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::ReportConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// A report request that did not produce a usable body. Always transient:
/// the caller keeps its previous snapshot and tries again next cycle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("report request timed out after {0:?}")]
    Timeout(Duration),
    #[error("report endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("report request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid {name} header value")]
    InvalidHeader { name: &'static str },
}

/// Posts the report form and returns the raw markup.
#[derive(Debug, Clone)]
pub struct ReportFetcher {
    client: reqwest::Client,
    config: Arc<ReportConfig>,
}

impl ReportFetcher {
    pub fn new(config: ReportConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers(&config)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_secs)
    }

    /// Perform one report request.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .post(&self.config.url)
            .form(&self.config.query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        resp.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Headers the report endpoint expects from its own in-browser XHR.
fn browser_headers(config: &ReportConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("text/html, */*; q=0.01"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,es;q=0.8"),
    );
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(
        "Sec-Ch-Ua",
        HeaderValue::from_static(
            r#""Chromium";v="136", "Google Chrome";v="136", "Not.A/Brand";v="99""#,
        ),
    );
    headers.insert("Sec-Ch-Ua-Mobile", HeaderValue::from_static("?0"));
    headers.insert("Sec-Ch-Ua-Platform", HeaderValue::from_static(r#""Windows""#));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-origin"));

    if let Ok(url) = reqwest::Url::parse(&config.url) {
        let origin = url.origin().ascii_serialization();
        if let Ok(value) = HeaderValue::from_str(&origin) {
            headers.insert(header::ORIGIN, value);
        }
    }
    if !config.referer.is_empty() {
        let value = HeaderValue::from_str(&config.referer)
            .map_err(|_| FetchError::InvalidHeader { name: "Referer" })?;
        headers.insert(header::REFERER, value);
    }
    if let Some(ref cookie) = config.cookie {
        let mut value = HeaderValue::from_str(cookie)
            .map_err(|_| FetchError::InvalidHeader { name: "Cookie" })?;
        value.set_sensitive(true);
        headers.insert(header::COOKIE, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::{HeaderMap as RequestHeaders, StatusCode};
    use axum::routing::post;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/report")
    }

    fn fetcher_for(url: String) -> ReportFetcher {
        ReportFetcher::new(ReportConfig {
            url,
            cookie: Some("ASPSESSIONID=abc".to_string()),
            timeout_secs: 1,
            ..ReportConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn posts_form_with_headers_and_returns_body() {
        let app = Router::new().route(
            "/report",
            post(|headers: RequestHeaders, body: String| async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let xhr = headers.contains_key("x-requested-with");
                format!("cookie={cookie};xhr={xhr};{body}")
            }),
        );
        let fetcher = fetcher_for(serve(app).await);

        let body = fetcher.fetch().await.unwrap();
        assert!(body.starts_with("cookie=ASPSESSIONID=abc;xhr=true;"));
        assert!(body.contains("firstSortCol=FullName"));
        assert!(body.contains("split=1400%2C1401"));
        assert!(body.contains("altSLThreshold=20"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/report",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let fetcher = fetcher_for(serve(app).await);
        match fetcher.fetch().await {
            Err(FetchError::Status(status)) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let app = Router::new().route(
            "/report",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let fetcher = fetcher_for(serve(app).await);
        assert!(matches!(fetcher.fetch().await, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher = fetcher_for(format!("http://{addr}/report"));
        assert!(matches!(fetcher.fetch().await, Err(FetchError::Transport(_))));
    }

    #[test]
    fn rejects_cookie_with_control_characters() {
        let result = ReportFetcher::new(ReportConfig {
            cookie: Some("bad\nvalue".to_string()),
            ..ReportConfig::default()
        });
        assert!(matches!(
            result,
            Err(FetchError::InvalidHeader { name: "Cookie" })
        ));
    }

    #[test]
    fn poll_interval_follows_config() {
        let fetcher = ReportFetcher::new(ReportConfig::default()).unwrap();
        assert_eq!(fetcher.poll_interval(), Duration::from_secs(15));
        assert_eq!(fetcher.config().timeout_secs, 10);
    }
}
