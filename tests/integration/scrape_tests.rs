use prodact::config::{Config, OutputFormat};
use prodact::scraper::{build_catalogue, start_catalogue, StopReason};
use prodact::{ConfigError, ProdactError};
use std::io::Write;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock store
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = Some(base_url.to_string());
    config.scraper.rate_limit_ms = 0;
    config.scraper.user_agent = "prodact-test/1.0".to_string();
    config
}

/// Builds a search result page body from (id, available) pairs
fn page_body(products: &[(u64, bool)], total_hits: u64) -> String {
    let products: Vec<String> = products
        .iter()
        .map(|(id, available)| {
            format!(
                r#"{{"id":{id},"full_name":"Product {id} 500 g","name":"Product {id}","front_url":"/no/products/{id}/","gross_price":"{id}9.90","currency":"NOK","availability":{{"is_available":{available}}},"discount":null}}"#
            )
        })
        .collect();
    format!(
        r#"{{"attributes":{{"total_hits":{}}},"products":[{}],"categories":[{{"title":"Meieri"}}]}}"#,
        total_hits,
        products.join(",")
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves pages 1 (ids 1, 2), 2 (id 3) and an empty page 3
async fn mount_three_pages(server: &MockServer) {
    mount_page(server, 1, page_body(&[(1, true), (2, false)], 3)).await;
    mount_page(server, 2, page_body(&[(3, true)], 3)).await;
    mount_page(server, 3, page_body(&[], 3)).await;
}

async fn scrape_to_string(config: &Config) -> (prodact::output::ScrapeSummary, String) {
    let (summary, sink) = build_catalogue(config, Vec::new(), CancellationToken::new())
        .await
        .expect("scrape failed");
    (summary, String::from_utf8(sink).expect("output is not UTF-8"))
}

#[tokio::test]
async fn test_full_catalogue_in_order() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let config = create_test_config(&server.uri());
    let (summary, output) = scrape_to_string(&config).await;

    assert_eq!(
        output,
        "1. 1, Product 1, 19.90NOK, true\n\
         2. 2, Product 2, 29.90NOK, false\n\
         3. 3, Product 3, 39.90NOK, true\n"
    );
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.products_received, 3);
    assert_eq!(summary.total_hits, Some(3));
    assert!(summary.errors.is_empty());
    assert!(summary.is_complete());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_only_available_products() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let mut config = create_test_config(&server.uri());
    config.output.only_available = true;
    let (summary, output) = scrape_to_string(&config).await;

    let ids: Vec<&str> = output
        .lines()
        .map(|line| line.split(", ").next().unwrap().split(". ").nth(1).unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(summary.products_written, 2);
    assert_eq!(summary.products_filtered(), 1);
}

#[tokio::test]
async fn test_rerun_is_identical() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let config = create_test_config(&server.uri());
    let (_, first) = scrape_to_string(&config).await;
    let (_, second) = scrape_to_string(&config).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&[], 0)).await;

    let config = create_test_config(&server.uri());
    let (summary, output) = scrape_to_string(&config).await;

    assert!(output.is_empty());
    assert_eq!(summary.products_received, 0);
    assert_eq!(summary.pages_fetched, 1);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn test_invalid_json_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_body(&[(1, true)], 2)).await;
    mount_page(&server, 2, "Service Unavailable".to_string()).await;
    mount_page(&server, 3, page_body(&[(2, true)], 2)).await;

    let config = create_test_config(&server.uri());
    let (summary, output) = scrape_to_string(&config).await;

    assert_eq!(output.lines().count(), 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("page #2"));
    assert_eq!(summary.stop_reason, StopReason::PageError);
    // Page 3 is never requested
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unsupported_store_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.scraper.store = "carrefour".to_string();

    let result = start_catalogue(&config, CancellationToken::new());
    assert!(matches!(
        result,
        Err(ProdactError::Config(ConfigError::UnsupportedStore(ref s))) if s == "carrefour"
    ));

    let result = build_catalogue(&config, Vec::new(), CancellationToken::new()).await;
    assert!(result.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rate_limit_spacing() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let mut config = create_test_config(&server.uri());
    config.scraper.rate_limit_ms = 40;

    let start = Instant::now();
    let (summary, _) = scrape_to_string(&config).await;

    // Three pages fetched, two pauses in between
    assert_eq!(summary.pages_fetched, 3);
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_query_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .and(query_param("q", "brunost"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&[], 0)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.scraper.query = "brunost".to_string();
    let (summary, _) = scrape_to_string(&config).await;

    assert_eq!(summary.pages_fetched, 1);
}

#[tokio::test]
async fn test_csv_catalogue_file() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let mut config = create_test_config(&server.uri());
    config.output.format = OutputFormat::Csv;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    let (summary, _) = build_catalogue(&config, file.as_file_mut(), CancellationToken::new())
        .await
        .unwrap();
    file.flush().unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(summary.products_written, 3);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("index,id,name"));
    assert_eq!(
        lines[1],
        "1,1,Product 1,Product 1 500 g,19.90,NOK,true,/no/products/1/"
    );
}

#[tokio::test]
async fn test_cancelled_scrape_closes_output() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let config = create_test_config(&server.uri());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let (summary, sink) = build_catalogue(&config, Vec::new(), cancel).await.unwrap();

    assert!(sink.is_empty());
    assert_eq!(summary.stop_reason, StopReason::Cancelled);
    assert!(server.received_requests().await.unwrap().is_empty());
}
