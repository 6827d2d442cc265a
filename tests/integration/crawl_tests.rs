//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use linkchecker::state::status::{PROBLEM_NON_OK, PROBLEM_RATE_LIMITED, PROBLEM_TIMEOUT};
use linkchecker::{check_site_links, CheckResult, CheckSpeed, CheckerConfig, LinkChecker, Status};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast, verbose test configuration
fn test_config() -> CheckerConfig {
    CheckerConfig::default()
        .with_speed(CheckSpeed::Warp)
        .with_request_timeout(Duration::from_secs(5))
        .with_verbose(true)
}

/// An HTML page linking to each of `links`
fn page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();

    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

/// Answers every HEAD request with 200
async fn mount_head_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Mounts a GET page at `route`
async fn mount_page(server: &MockServer, route: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(page(links))
        .mount(server)
        .await;
}

/// Runs a crawl, draining results concurrently, and returns them sorted by URL
async fn run_check(seed: &str, config: CheckerConfig) -> (Vec<CheckResult>, LinkChecker) {
    let mut checker = LinkChecker::new(config).expect("Failed to create checker");
    let results = checker.results().expect("Results already taken");

    let collector = tokio::spawn(results.collect_all());
    checker.check(seed).await.expect("Crawl failed");
    let results = collector.await.expect("Collector panicked");

    (results, checker)
}

fn find<'a>(results: &'a [CheckResult], url: &str) -> &'a CheckResult {
    results
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("No result for {}", url))
}

#[tokio::test]
async fn test_full_crawl_reports_every_link_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/about", "/home"]).await;
    mount_page(&server, "/about", &["/zzz", "./"]).await;
    mount_page(&server, "/home", &["about"]).await;
    // /zzz is not mounted, so wiremock answers GET with 404

    let (results, _) = run_check(&base, test_config()).await;

    let urls: Vec<_> = results.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            base.clone(),
            format!("{}/about", base),
            format!("{}/home", base),
            format!("{}/zzz", base),
        ]
    );

    for url in [base.clone(), format!("{}/about", base), format!("{}/home", base)] {
        let result = find(&results, &url);
        assert_eq!(result.status, Status::Up, "{} should be up", url);
        assert_eq!(result.response_code, Some(200));
    }

    let broken = find(&results, &format!("{}/zzz", base));
    assert_eq!(broken.status, Status::Down);
    assert_eq!(broken.response_code, Some(404));
    assert_eq!(broken.problem.as_deref(), Some(PROBLEM_NON_OK));
    assert_eq!(broken.referring_site, format!("{}/about", base));

    assert_eq!(find(&results, &base).referring_site, base);
}

#[tokio::test]
async fn test_non_verbose_collects_only_problems() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/about", "/home"]).await;
    mount_page(&server, "/about", &["/zzz", "./"]).await;
    mount_page(&server, "/home", &["about"]).await;

    let config = test_config().with_verbose(false);
    let (results, checker) = run_check(&base, config).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("{}/zzz", base));
    assert_eq!(checker.visited_count(), 4);
}

#[tokio::test]
async fn test_check_site_links_stream_closes() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/one", "/two"]).await;
    mount_page(&server, "/one", &[]).await;
    mount_page(&server, "/two", &["/one"]).await;

    let mut stream = check_site_links(&base, test_config()).expect("Failed to start crawl");

    let mut received = Vec::new();
    while let Some(result) = tokio::time::timeout(Duration::from_secs(10), stream.recv())
        .await
        .expect("Stream did not close")
    {
        received.push(result);
    }

    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|r| r.is_up()));
}

#[tokio::test]
async fn test_unresolvable_seed_is_down() {
    let seed = "https://boguswebsite.invalid/home";
    let (results, _) = run_check(seed, test_config()).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.url, seed);
    assert_eq!(result.status, Status::Down);
    assert_eq!(result.response_code, None);
    assert_eq!(result.referring_site, seed);
    let problem = result.problem.as_deref().unwrap_or_default();
    assert!(
        problem.to_lowercase().contains("dns"),
        "problem should describe the lookup failure: {}",
        problem
    );
}

#[tokio::test]
async fn test_slow_server_is_rate_limited() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(1)))
        .mount(&server)
        .await;

    let config = test_config().with_request_timeout(Duration::from_millis(100));
    let (results, _) = run_check(&base, config).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, Status::RateLimited);
    assert_eq!(results[0].response_code, None);
    assert_eq!(results[0].problem.as_deref(), Some(PROBLEM_TIMEOUT));
}

#[tokio::test]
async fn test_mailto_and_ftp_links_are_ignored() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(
        &server,
        "/",
        &[
            "mailto:someone@example.com",
            "ftp://files.example.com/archive",
            "/contact",
        ],
    )
    .await;
    mount_page(&server, "/contact", &[]).await;

    let (results, _) = run_check(&base, test_config()).await;

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| !r.url.starts_with("mailto:") && !r.url.starts_with("ftp:")));
}

#[tokio::test]
async fn test_external_links_are_not_expanded() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base = site.uri();
    let external_page = format!("{}/page", external.uri());

    mount_head_ok(&site).await;
    mount_page(&site, "/", &[&external_page]).await;

    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .respond_with(page(&["/deeper"]))
        .expect(0)
        .mount(&external)
        .await;

    let (results, _) = run_check(&base, test_config()).await;

    assert_eq!(results.len(), 2);
    let result = find(&results, &external_page);
    assert_eq!(result.status, Status::Up);
    assert_eq!(result.response_code, Some(200));
    assert_eq!(result.referring_site, base);
}

#[tokio::test]
async fn test_external_head_rejection_falls_back_to_get() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base = site.uri();
    let external_page = format!("{}/page", external.uri());

    mount_head_ok(&site).await;
    mount_page(&site, "/", &[&external_page]).await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(page(&["/deeper"]))
        .expect(1)
        .mount(&external)
        .await;

    let (results, _) = run_check(&base, test_config()).await;

    assert_eq!(results.len(), 2);
    let result = find(&results, &external_page);
    assert_eq!(result.status, Status::Up);
    assert_eq!(result.response_code, Some(200));
}

#[tokio::test]
async fn test_shared_link_is_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    mount_page(&server, "/", &["/a", "/b", "/c", "/shared"]).await;
    mount_page(&server, "/a", &["/shared", "/b"]).await;
    mount_page(&server, "/b", &["/shared", "/shared"]).await;
    mount_page(&server, "/c", &["/shared", "/a"]).await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(page(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let (results, _) = run_check(&base, test_config()).await;

    assert_eq!(results.len(), 5);
    let shared = format!("{}/shared", base);
    assert_eq!(results.iter().filter(|r| r.url == shared).count(), 1);
}

#[tokio::test]
async fn test_too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/busy"]).await;

    let (results, _) = run_check(&base, test_config()).await;

    let busy = find(&results, &format!("{}/busy", base));
    assert_eq!(busy.status, Status::RateLimited);
    assert_eq!(busy.response_code, Some(429));
    assert_eq!(busy.problem.as_deref(), Some(PROBLEM_RATE_LIMITED));
}

#[tokio::test]
async fn test_non_standard_code_is_unable_to_verify() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .and(path("/odd"))
        .respond_with(ResponseTemplate::new(999))
        .mount(&server)
        .await;
    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/odd"]).await;

    let (results, _) = run_check(&base, test_config()).await;

    let odd = find(&results, &format!("{}/odd", base));
    assert_eq!(odd.status, Status::NonStandard);
    assert_eq!(odd.response_code, Some(999));
    assert_eq!(odd.status.to_string(), "Unable to verify");
}

#[tokio::test]
async fn test_internal_page_must_answer_200() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/created"]).await;
    Mock::given(method("GET"))
        .and(path("/created"))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"<a href="/hidden">x</a>"#))
        .mount(&server)
        .await;

    let (results, _) = run_check(&base, test_config()).await;

    assert_eq!(results.len(), 2);
    let created = find(&results, &format!("{}/created", base));
    assert_eq!(created.status, Status::Down);
    assert_eq!(created.response_code, Some(201));
    assert_eq!(created.problem.as_deref(), Some(PROBLEM_NON_OK));
}

#[tokio::test]
async fn test_malformed_link_is_reported_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["http://[::1", "/other"]).await;
    mount_page(&server, "/other", &["http://[::1"]).await;

    let (results, _) = run_check(&base, test_config()).await;

    let malformed: Vec<_> = results.iter().filter(|r| r.url == "http://[::1").collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].status, Status::Down);
    assert_eq!(malformed[0].response_code, None);
    assert!(malformed[0].problem.is_some());
}

#[tokio::test]
async fn test_progress_reaches_completion() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/about", "/home"]).await;
    mount_page(&server, "/about", &["/home"]).await;
    mount_page(&server, "/home", &["/about"]).await;

    let (_, checker) = run_check(&base, test_config()).await;

    let progress = checker.progress();
    assert_eq!(progress.percent(), 100.0);
    assert_eq!(progress.done(), progress.total());
    assert!(progress.total() >= 3);
}

#[tokio::test]
async fn test_seed_without_scheme_is_probed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let address = base.trim_start_matches("http://").to_string();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &["/about"]).await;
    mount_page(&server, "/about", &[]).await;

    let (results, _) = run_check(&address, test_config()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(find(&results, &base).status, Status::Up);
    assert_eq!(find(&results, &format!("{}/about", base)).status, Status::Up);
}

#[tokio::test]
async fn test_links_back_to_root_do_not_revisit_it() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(page(&["/", "./", "/about"]))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/about", &["/", &format!("{}/", base)]).await;

    let (results, _) = run_check(&base, test_config()).await;

    let root_results = results
        .iter()
        .filter(|r| r.url == base || r.url == format!("{}/", base))
        .count();
    assert_eq!(root_results, 1, "root reported {} times", root_results);
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_seed_without_scheme_with_url_in_query_is_probed() {
    let server = MockServer::start().await;
    let address = server.uri().trim_start_matches("http://").to_string();
    let seed = format!("{}/?next=http://x", address);

    mount_head_ok(&server).await;
    mount_page(&server, "/", &[]).await;

    let (results, _) = run_check(&seed, test_config()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("http://{}", seed));
    assert_eq!(results[0].status, Status::Up);
    assert_eq!(results[0].response_code, Some(200));
}

#[tokio::test]
async fn test_checker_runs_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_page(&server, "/", &[]).await;

    let (_, mut checker) = run_check(&base, test_config()).await;
    assert!(checker.check(&base).await.is_err());
}
