//! Exposition routes, including reads while a scrape is in flight.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use ds389_exporter::{app_state::AppState, config, router};

use fake_directory::{FakeDirectory, Gate};

fn state() -> AppState {
    let cfg = config::load_from_str(
        r#"
ldap:
  pass: "secret"
  ipa_domain: "example.org"
"#,
    )
    .unwrap();
    AppState::new(cfg).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let ctype = res
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, ctype, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn landing_page_links_metrics() {
    let app = router::build_router(state());
    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<a href='/metrics'>Metrics</a>"), "{body}");
}

#[tokio::test]
async fn metrics_before_first_scrape_has_no_series() {
    let app = router::build_router(state());
    let (status, ctype, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/plain"));
    assert!(body.contains("# TYPE ldap_389ds_users gauge"));
    assert!(!body
        .lines()
        .any(|l| l.starts_with("ldap_389ds_last_scrape_timestamp_seconds")));
}

#[tokio::test]
async fn metrics_after_scrape() {
    let st = state();
    let app = router::build_router(st.clone());
    st.scraper_with(FakeDirectory::healthy().into_connector())
        .run_once()
        .await
        .unwrap();

    let (_, _, body) = get(&app, "/metrics").await;
    assert!(body.contains("ldap_389ds_users{type=\"active\"} 42"), "{body}");
    assert!(body.contains("ldap_389ds_dns_zones 5"));
    assert!(body.contains("ldap_389ds_replication_status{server=\"ipa2.example.org\"} 1"));
    assert!(body.contains("ldap_389ds_scrape_count{result=\"ok\"} 1"));
    assert!(body
        .lines()
        .any(|l| l.starts_with("ldap_389ds_last_scrape_timestamp_seconds ")));
}

#[tokio::test]
async fn reads_do_not_wait_for_inflight_scrape() {
    let st = state();
    let app = router::build_router(st.clone());

    // Seed values from a completed scrape.
    st.scraper_with(FakeDirectory::healthy().into_connector())
        .run_once()
        .await
        .unwrap();

    let gate = Gate::new();
    let dir = FakeDirectory {
        gate: Some(Arc::clone(&gate)),
        ..FakeDirectory::healthy().subordinates("cn=users,cn=accounts", "43")
    };
    let scraper = st.scraper_with(dir.into_connector());
    let inflight = tokio::spawn(async move { scraper.run_once().await });

    gate.entered.notified().await;
    for _ in 0..5 {
        let (status, _, body) = tokio::time::timeout(Duration::from_secs(1), get(&app, "/metrics"))
            .await
            .expect("metrics read blocked on scrape");
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ldap_389ds_users{type=\"active\"} 42"));
    }

    gate.release.notify_one();
    inflight.await.unwrap().unwrap();

    let (_, _, body) = get(&app, "/metrics").await;
    assert!(body.contains("ldap_389ds_users{type=\"active\"} 43"));
    assert!(body.contains("ldap_389ds_scrape_count{result=\"ok\"} 2"));
}
