// tests/http_fetcher.rs
use eoy_charts::{pipeline, CrawlConfig, HttpFetcher, Mode, PageSource, RunOutput};
use std::time::{Duration, Instant};

fn cfg_for(origin: &str, delay_ms: u64) -> CrawlConfig {
    CrawlConfig {
        origin: origin.to_string(),
        delay_ms,
        ..CrawlConfig::default()
    }
}

#[tokio::test]
async fn success_returns_body_and_waits_afterwards() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", "/page")
        .with_status(200)
        .with_body("<html>ok</html>")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&cfg_for(&server.url(), 60)).unwrap();
    let t0 = Instant::now();
    let body = fetcher
        .fetch(&format!("{}/page", server.url()))
        .await
        .unwrap();
    assert_eq!(body, "<html>ok</html>");
    assert!(t0.elapsed() >= Duration::from_millis(60));
    m.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&cfg_for(&server.url(), 0)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/missing", server.url()))
        .await
        .unwrap_err();
    assert!(err.is_fetch());
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    let fetcher = HttpFetcher::new(&cfg_for("http://127.0.0.1:1", 0)).unwrap();
    let err = fetcher.fetch("http://127.0.0.1:1/x").await.unwrap_err();
    assert!(err.is_fetch());
}

#[tokio::test]
async fn full_run_against_local_server() {
    let mut server = mockito::Server::new_async().await;
    let index = r#"
        <a class="charts-index-chart" href="/charts/boomkat-end-of-year-charts-2019/10-alice">Alice</a>
        <a class="charts-index-chart" href="/charts/boomkat-end-of-year-charts-2019/940">Skip</a>"#;
    let chart = r#"
        <h1 class="chart-topbanner-title">Alice 2019</h1>
        <div class="chart-item">
          <a href="/products/one"></a>
          <span class="release__artist">One</span><span class="release__title">First</span>
        </div>"#;

    let _index = server
        .mock("GET", "/charts/boomkat-end-of-year-charts-2019")
        .with_status(200)
        .with_body(index)
        .create_async()
        .await;
    let _chart = server
        .mock("GET", "/charts/boomkat-end-of-year-charts-2019/10-alice")
        .with_status(200)
        .with_body(chart)
        .create_async()
        .await;
    let denied = server
        .mock("GET", "/charts/boomkat-end-of-year-charts-2019/940")
        .expect(0)
        .create_async()
        .await;

    let cfg = cfg_for(&server.url(), 0);
    let fetcher = HttpFetcher::new(&cfg).unwrap();
    let out = pipeline::run(&fetcher, &cfg, "2019", Mode::Merged)
        .await
        .unwrap();

    let RunOutput::Merged(report) = out else {
        panic!("expected merged output");
    };
    assert_eq!(report.data.len(), 1);
    assert_eq!(report.data[0].artist, "One");
    assert_eq!(
        report.data[0].item_url.as_deref(),
        Some(format!("{}/products/one", server.url()).as_str())
    );
    denied.assert_async().await;
}
