#[allow(dead_code)]
mod common;

use common::{TestServer, Upstream, fixture_report, get_with_session, open_session, refreshed_session};

async fn post_settings(
    server: &TestServer,
    cookie: &str,
    form: &[(&str, &str)],
) -> reqwest::Response {
    reqwest::Client::new()
        .post(server.api("/settings"))
        .header("cookie", cookie)
        .form(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn settings_start_from_configured_defaults() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::new(&upstream).await;
    let cookie = open_session(&server).await;

    let body: serde_json::Value = get_with_session(&server, &cookie, "/settings")
        .await
        .json()
        .await
        .unwrap();
    let t = &body["thresholds"];
    assert_eq!(t["Long Call"], 360);
    assert_eq!(t["Extended Lunch"], 3600);
    assert_eq!(t["Long ACW"], 120);
    assert_eq!(t["Extended Break"], 900);
    assert_eq!(t["IT Issue"], 30);
    assert_eq!(t["Long Hold"], 120);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn valid_update_is_applied() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::new(&upstream).await;
    let cookie = open_session(&server).await;

    let resp = post_settings(&server, &cookie, &[("Long Call", "600"), ("Long Hold", "45")]).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Alert settings updated successfully");
    assert_eq!(body["thresholds"]["Long Call"], 600);
    assert_eq!(body["thresholds"]["Long Hold"], 45);
    assert_eq!(body["thresholds"]["Long ACW"], 120);

    let body: serde_json::Value = get_with_session(&server, &cookie, "/settings")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["thresholds"]["Long Call"], 600);
}

#[tokio::test]
async fn invalid_update_changes_nothing() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::new(&upstream).await;
    let cookie = open_session(&server).await;

    for bad in ["abc", "-5", "1.5", ""] {
        let resp = post_settings(&server, &cookie, &[("Long Call", "10"), ("IT Issue", bad)]).await;
        assert_eq!(resp.status(), 400, "value {bad:?}");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Please enter valid numbers for all fields");
    }

    let body: serde_json::Value = get_with_session(&server, &cookie, "/settings")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["thresholds"]["Long Call"], 360);
    assert_eq!(body["thresholds"]["IT Issue"], 30);
}

#[tokio::test]
async fn settings_are_per_session() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::new(&upstream).await;
    let first = open_session(&server).await;
    let second = open_session(&server).await;

    post_settings(&server, &first, &[("Long ACW", "5")]).await;

    let body: serde_json::Value = get_with_session(&server, &second, "/settings")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["thresholds"]["Long ACW"], 120);
}

#[tokio::test]
async fn settings_post_without_session_is_rejected() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::new(&upstream).await;

    let resp = post_settings(&server, "session_id=nope", &[("Long Call", "10")]).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid session");
}

#[tokio::test]
async fn lowered_threshold_reclassifies_on_next_refresh() {
    let upstream = Upstream::start(fixture_report()).await;
    let server = TestServer::fast_polling(&upstream).await;
    let cookie = refreshed_session(&server).await;

    // Cy Park has been in ACW for 30 seconds.
    post_settings(&server, &cookie, &[("Long ACW", "10")]).await;
    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    let body: serde_json::Value = get_with_session(&server, &cookie, "/alerts")
        .await
        .json()
        .await
        .unwrap();
    let kinds: Vec<&str> = body["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["Long Call", "Long ACW"]);
}
