//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to serve a small bookshop and run the full
//! discover, collect and harvest cycle end-to-end.

use shelfscan::config::{
    Config, FetchConfig, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_EXCLUDED_CATEGORY,
};
use shelfscan::crawler::{crawl, FetchError, ListingError, Pipeline};
use shelfscan::storage::{open_sinks, MemorySink, SqliteSink};
use shelfscan::{PipelineStage, ShelfError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer) -> Config {
    Config {
        site: SiteConfig {
            base_url: format!("{}/", server.uri()),
            excluded_category: DEFAULT_EXCLUDED_CATEGORY.to_string(),
        },
        fetch: FetchConfig {
            liveness_timeout_ms: 1000,
            discovery_timeout_ms: 1000,
            listing_timeout_ms: 500,
            detail_timeout_ms: 500,
            max_concurrent_listings: None,
            max_concurrent_details: 1,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig::default(),
    }
}

fn category_href(slug: &str) -> String {
    format!("catalogue/category/books/{}/index.html", slug)
}

fn root_page(slugs: &[&str]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| format!(r#"<li><a href="{}">{}</a></li>"#, category_href(slug), slug))
        .collect();
    format!(
        r#"<html><body><div class="side_categories"><ul class="nav nav-list"><li>
            <a href="{}">Books</a>
            <ul>{}</ul>
        </li></ul></div></body></html>"#,
        DEFAULT_EXCLUDED_CATEGORY, items
    )
}

fn listing_page(books: &[&str]) -> String {
    let items: String = books
        .iter()
        .map(|book| {
            format!(
                r#"<li class="col-xs-6"><article class="product_pod">
                    <h3><a href="../../../{}/index.html" title="{}">{}</a></h3>
                </article></li>"#,
                book, book, book
            )
        })
        .collect();
    format!(
        r#"<html><body><section><ol class="row">{}</ol></section></body></html>"#,
        items
    )
}

fn detail_page(title: &str, upc: &str) -> String {
    format!(
        r#"<html><body><div id="content_inner"><article class="product_page">
            <div class="row">
                <div class="col-sm-6"><div id="product_gallery"><img src="../../media/{upc}.jpg" alt="{title}" /></div></div>
                <div class="col-sm-6 product_main">
                    <h1>{title}</h1>
                    <p class="price_color">£10.00</p>
                </div>
            </div>
            <p>About {title}.</p>
            <table class="table table-striped">
                <tr><th>UPC</th><td>{upc}</td></tr>
                <tr><th>Availability</th><td>In stock (3 available)</td></tr>
            </table>
        </article></div></body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    mount_page(server, route, ResponseTemplate::new(200).set_body_string(body)).await;
}

async fn mount_root(server: &MockServer, slugs: &[&str]) {
    mount_html(server, "/", root_page(slugs)).await;
}

async fn mount_category(server: &MockServer, slug: &str, books: &[&str]) {
    mount_html(
        server,
        &format!("/{}", category_href(slug)),
        listing_page(books),
    )
    .await;
}

async fn mount_book(server: &MockServer, book: &str, title: &str) {
    mount_html(
        server,
        &format!("/catalogue/{}/index.html", book),
        detail_page(title, &format!("upc-{}", book)),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_with_slow_category_and_missing_book() {
    let server = MockServer::start().await;

    mount_root(&server, &["alpha_2", "beta_3"]).await;

    // Alpha answers after the listing timeout
    mount_page(
        &server,
        &format!("/{}", category_href("alpha_2")),
        ResponseTemplate::new(200)
            .set_body_string(listing_page(&["alpha-book_1"]))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    mount_book(&server, "alpha-book_1", "Alpha Book").await;

    mount_category(&server, "beta_3", &["beta-one_10", "beta-gone_11"]).await;
    mount_book(&server, "beta-one_10", "Beta One").await;
    mount_page(
        &server,
        "/catalogue/beta-gone_11/index.html",
        ResponseTemplate::new(404),
    )
    .await;

    let config = create_test_config(&server);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let mut sink = MemorySink::new();

    let report = pipeline.run(&mut sink).await.expect("Crawl failed");

    assert_eq!(pipeline.stage(), PipelineStage::Done);
    assert_eq!(sink.accept_calls(), 1);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Beta One");
    assert_eq!(records[0].category, "Beta");
    assert_eq!(
        records[0].source_url,
        format!("{}/catalogue/beta-one_10/index.html", server.uri())
    );
    assert_eq!(
        records[0].picture_url,
        format!("{}/media/upc-beta-one_10.jpg", server.uri())
    );

    assert!(report.root_reachable);
    assert_eq!(report.categories_discovered, 2);
    assert_eq!(report.categories_collected, 1);
    assert_eq!(report.category_failures.len(), 1);
    assert_eq!(report.category_failures[0].name, "Alpha");
    assert_eq!(report.items_listed, 2);
    assert_eq!(report.records_harvested, 1);
    assert_eq!(report.skipped_items.len(), 1);
    assert!(report.skipped_items[0].url.ends_with("beta-gone_11/index.html"));
}

#[tokio::test]
async fn test_missing_book_is_skipped_in_order() {
    let server = MockServer::start().await;

    let books = ["one_1", "two_2", "three_3", "four_4", "five_5"];
    mount_root(&server, &["poetry_23"]).await;
    mount_category(&server, "poetry_23", &books).await;
    for (i, book) in books.iter().enumerate() {
        if *book == "three_3" {
            mount_page(
                &server,
                "/catalogue/three_3/index.html",
                ResponseTemplate::new(404),
            )
            .await;
        } else {
            mount_book(&server, book, &format!("Book {}", i + 1)).await;
        }
    }

    let config = create_test_config(&server);
    let mut sink = MemorySink::new();

    let report = crawl(&config, &mut sink).await.expect("Crawl failed");

    let titles: Vec<&str> = sink.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 2", "Book 4", "Book 5"]);
    assert!(sink.records().iter().all(|r| r.category == "Poetry"));
    assert_eq!(report.skipped_items.len(), 1);
}

#[tokio::test]
async fn test_failed_category_does_not_affect_siblings() {
    let server = MockServer::start().await;

    mount_root(&server, &["broken_2", "travel_3"]).await;
    mount_page(
        &server,
        &format!("/{}", category_href("broken_2")),
        ResponseTemplate::new(500),
    )
    .await;
    mount_category(&server, "travel_3", &["trip_7"]).await;
    mount_book(&server, "trip_7", "Trip").await;

    let config = create_test_config(&server);
    let mut sink = MemorySink::new();

    let report = crawl(&config, &mut sink).await.expect("Crawl failed");

    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].category, "Travel");
    assert_eq!(report.category_failures.len(), 1);
    assert_eq!(report.category_failures[0].name, "Broken");
    assert_eq!(
        report.category_failures[0].reason,
        ListingError::Fetch(FetchError::HttpError(500)).to_string()
    );
}

#[tokio::test]
async fn test_category_without_listing_container() {
    let server = MockServer::start().await;

    mount_root(&server, &["empty_2", "mystery_3"]).await;
    mount_html(
        &server,
        &format!("/{}", category_href("empty_2")),
        "<html><body><p>Nothing here</p></body></html>".to_string(),
    )
    .await;
    mount_category(&server, "mystery_3", &["whodunit_9"]).await;
    mount_book(&server, "whodunit_9", "Whodunit").await;

    let config = create_test_config(&server);
    let mut sink = MemorySink::new();

    let report = crawl(&config, &mut sink).await.expect("Crawl failed");

    assert_eq!(sink.records().len(), 1);
    assert_eq!(report.categories_collected, 1);
    assert_eq!(report.category_failures[0].name, "Empty");
}

#[tokio::test]
async fn test_empty_root_page_is_fatal() {
    let server = MockServer::start().await;
    mount_html(&server, "/", String::new()).await;

    let config = create_test_config(&server);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let mut sink = MemorySink::new();

    let result = pipeline.run(&mut sink).await;

    assert!(matches!(result, Err(ShelfError::EmptyRootPage { .. })));
    assert_eq!(pipeline.stage(), PipelineStage::Failed);
    assert_eq!(sink.accept_calls(), 0);
}

#[tokio::test]
async fn test_missing_navigation_is_fatal() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        "<html><body><h1>Welcome</h1></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&server);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let mut sink = MemorySink::new();

    let result = pipeline.run(&mut sink).await;

    assert!(matches!(result, Err(ShelfError::NavigationMissing { .. })));
    assert_eq!(pipeline.stage(), PipelineStage::Failed);
    assert_eq!(sink.accept_calls(), 0);
}

#[tokio::test]
async fn test_root_not_found_is_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", ResponseTemplate::new(404)).await;

    let config = create_test_config(&server);
    let mut sink = MemorySink::new();

    let result = crawl(&config, &mut sink).await;

    match result {
        Err(ShelfError::Fetch { source, .. }) => {
            assert_eq!(source, FetchError::HttpError(404));
        }
        other => panic!("Expected fetch error, got {:?}", other.map(|r| r.stage)),
    }
}

#[tokio::test]
async fn test_concurrent_details_keep_listing_order() {
    let server = MockServer::start().await;

    mount_root(&server, &["first_2", "second_3"]).await;
    mount_category(&server, "first_2", &["a_1", "b_2", "c_3"]).await;
    mount_category(&server, "second_3", &["d_4", "e_5"]).await;

    // Earlier books answer slower so completion order differs from listing order
    for (i, book) in ["a_1", "b_2", "c_3", "d_4", "e_5"].iter().enumerate() {
        mount_page(
            &server,
            &format!("/catalogue/{}/index.html", book),
            ResponseTemplate::new(200)
                .set_body_string(detail_page(book, book))
                .set_delay(Duration::from_millis(50 * (5 - i as u64))),
        )
        .await;
    }

    let mut config = create_test_config(&server);
    config.fetch.max_concurrent_details = 4;
    config.fetch.max_concurrent_listings = Some(1);

    let mut sink = MemorySink::new();
    crawl(&config, &mut sink).await.expect("Crawl failed");

    let titles: Vec<&str> = sink.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["a_1", "b_2", "c_3", "d_4", "e_5"]);
    let categories: Vec<&str> = sink.records().iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["First", "First", "First", "Second", "Second"]);
}

#[tokio::test]
async fn test_configured_sinks_receive_records() {
    let server = MockServer::start().await;

    mount_root(&server, &["history_4"]).await;
    mount_category(&server, "history_4", &["old_1", "older_2"]).await;
    mount_book(&server, "old_1", "Old").await;
    mount_book(&server, "older_2", "Older").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("books.db");
    let json_path = dir.path().join("books.json");

    let mut config = create_test_config(&server);
    config.output = OutputConfig {
        database_path: Some(db_path.display().to_string()),
        json_path: Some(json_path.display().to_string()),
        summary_path: None,
    };

    let mut sinks = open_sinks(&config.output, "test_hash").expect("Failed to open sinks");
    crawl(&config, &mut sinks).await.expect("Crawl failed");
    drop(sinks);

    let stored = SqliteSink::new(&db_path, "test_hash").expect("Failed to reopen database");
    let run = stored
        .latest_run()
        .expect("Failed to query runs")
        .expect("No run stored");
    assert_eq!(run.record_count, 2);
    assert_eq!(run.config_hash, "test_hash");
    let records = stored.load_records(run.id).expect("Failed to load records");
    assert_eq!(records[0].title, "Old");
    assert_eq!(records[1].title, "Older");

    let json = std::fs::read_to_string(&json_path).expect("JSON file missing");
    let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    assert_eq!(value[1]["category"], "History");
    assert_eq!(value[1]["upc"], "upc-older_2");
}

#[tokio::test]
async fn test_unhealthy_root_probe_does_not_stop_run() {
    let server = MockServer::start().await;

    // First request to the root (the liveness probe) fails, later ones succeed
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_root(&server, &["fiction_5"]).await;
    mount_category(&server, "fiction_5", &["novel_1"]).await;
    mount_book(&server, "novel_1", "Novel").await;

    let config = create_test_config(&server);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let mut sink = MemorySink::new();

    let report = pipeline.run(&mut sink).await.expect("Crawl failed");

    assert!(!report.root_reachable);
    assert_eq!(pipeline.stage(), PipelineStage::Done);
    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].title, "Novel");
}

/// Mounts three categories whose listing pages each answer after `delay`
async fn mount_slow_categories(server: &MockServer, delay: Duration) {
    let slugs = ["north_2", "south_3", "east_4"];
    mount_root(server, &slugs).await;
    for slug in slugs {
        mount_page(
            server,
            &format!("/{}", category_href(slug)),
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[]))
                .set_delay(delay),
        )
        .await;
    }
}

#[tokio::test]
async fn test_uncapped_listings_are_fetched_concurrently() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(600);
    mount_slow_categories(&server, delay).await;

    let mut config = create_test_config(&server);
    config.fetch.listing_timeout_ms = 5000;
    let mut sink = MemorySink::new();

    let started = std::time::Instant::now();
    let report = crawl(&config, &mut sink).await.expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.categories_collected, 3);
    assert!(
        elapsed < Duration::from_millis(1500),
        "three 600ms listings took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_listing_cap_limits_concurrency() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(400);
    mount_slow_categories(&server, delay).await;

    let mut config = create_test_config(&server);
    config.fetch.listing_timeout_ms = 5000;
    config.fetch.max_concurrent_listings = Some(1);
    let mut sink = MemorySink::new();

    let started = std::time::Instant::now();
    let report = crawl(&config, &mut sink).await.expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.categories_collected, 3);
    assert!(
        elapsed >= delay * 3,
        "capped listings finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_non_200_success_status_is_skipped() {
    let server = MockServer::start().await;

    mount_root(&server, &["art_6"]).await;
    mount_category(&server, "art_6", &["partial_1", "full_2"]).await;
    mount_page(
        &server,
        "/catalogue/partial_1/index.html",
        ResponseTemplate::new(203).set_body_string(detail_page("Partial", "upc-partial_1")),
    )
    .await;
    mount_book(&server, "full_2", "Full").await;

    let config = create_test_config(&server);
    let mut sink = MemorySink::new();

    let report = crawl(&config, &mut sink).await.expect("Crawl failed");

    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].title, "Full");
    assert_eq!(report.skipped_items.len(), 1);
    assert_eq!(
        report.skipped_items[0].reason,
        FetchError::HttpError(203).to_string()
    );
}
