use listing_harvest::config::FetcherConfig;
use listing_harvest::crawler::{build_http_client, discover_page_count, Coordinator, NoProgress};
use listing_harvest::listing::fields;
use listing_harvest::output::{table_path, write_table, Table, UTF8_BOM};
use listing_harvest::{Category, StopReason};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches the `page` query parameter; `None` matches requests without one
struct PageParam(Option<u32>);

impl Match for PageParam {
    fn matches(&self, request: &Request) -> bool {
        let page = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.to_string());

        match self.0 {
            None => page.is_none(),
            Some(n) => page.as_deref() == Some(n.to_string().as_str()),
        }
    }
}

fn test_fetcher_config() -> FetcherConfig {
    FetcherConfig {
        user_agent: "TestAgent/1.0".to_string(),
        timeout_secs: 5,
        page_delay_ms: 0,
    }
}

fn card(title: &str, price: &str) -> String {
    format!(
        r#"<div class="listings-cards__list-item">
            <h2 class="listing-card__header__title"><a href="/annonce">{}</a></h2>
            <h3 class="listing-card__header__price">{}</h3>
            <li class="listing-card__attribute">50 000 km</li>
            <li class="listing-card__attribute">Manuelle</li>
            <li class="listing-card__attribute">Diesel</li>
            <span class="town-suburb">Plateau</span>
            <span class="province">Dakar</span>
        </div>"#,
        title, price
    )
}

fn index_page(cards: &[String], max_page: Option<u32>) -> String {
    let paginator = match max_page {
        Some(max) => {
            let links: String = (2..=max)
                .map(|p| format!(r#"<a class="page-link" href="/cars?page={}">{}</a>"#, p, p))
                .collect();
            format!(r#"<nav class="paginator">{}</nav>"#, links)
        }
        None => String::new(),
    };
    format!(
        r#"<html><head><title>Voitures</title></head><body>
        <div class="listings-cards">{}</div>{}
        </body></html>"#,
        cards.concat(),
        paginator
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page: Option<u32>, body: String) {
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(PageParam(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn collecting_sink() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + 'static) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let lines = Arc::clone(&lines);
        move |message: &str| lines.lock().unwrap().push(message.to_string())
    };
    (lines, sink)
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_scrape_two_pages_in_order() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        index_page(&[card("Toyota Yaris 2018", "4 000 000 F"), card("Kia Picanto 2020", "5 000 000 F")], None),
    )
    .await;
    mount_page(&server, Some(2), index_page(&[card("Ford Focus 2012", "2 500 000 F")], None)).await;

    let (lines, sink) = collecting_sink();
    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(sink);

    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(2), &CancellationToken::new())
        .await;

    assert_eq!(report.stop_reason, StopReason::Completed);
    assert_eq!(report.pages_scraped, 2);
    let titles: Vec<_> = report
        .records
        .iter()
        .map(|r| r.get(fields::TITLE).unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Toyota Yaris 2018", "Kia Picanto 2020", "Ford Focus 2012"]
    );
    assert_eq!(report.records[2].get(fields::BRAND), Some("Ford"));
    assert_eq!(report.records[2].get(fields::ADDRESS), Some("Plateau Dakar"));

    let lines = lines.lock().unwrap();
    assert_eq!(lines[0], "Scraping page 1/2...");
    assert_eq!(lines[1], "Scraping page 2/2...");
    assert_eq!(lines.last().unwrap(), "Total vehicles scraped: 3");
}

#[tokio::test]
async fn test_empty_page_stops_the_loop() {
    let server = MockServer::start().await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], None)).await;
    mount_page(&server, Some(2), index_page(&[card("Kia Rio 2019", "2 F")], None)).await;
    mount_page(&server, Some(3), index_page(&[], None)).await;
    for page in 4..=10 {
        mount_page(&server, Some(page), index_page(&[card("Never Seen", "9 F")], None)).await;
    }

    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(NoProgress);
    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(10), &CancellationToken::new())
        .await;

    assert_eq!(report.stop_reason, StopReason::EmptyPage { page: 3 });
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.pages_scraped, 2);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_fetch_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], None)).await;
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(PageParam(Some(2)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (lines, sink) = collecting_sink();
    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(sink);
    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Motorcycles, &base_url, Some(4), &CancellationToken::new())
        .await;

    assert_eq!(report.stop_reason, StopReason::FetchFailed { page: 2 });
    assert_eq!(report.records.len(), 1);
    assert_eq!(request_count(&server).await, 2);
    assert!(lines
        .lock()
        .unwrap()
        .contains(&"Could not fetch page 2, stopping.".to_string()));
}

#[tokio::test]
async fn test_page_count_discovered_when_not_given() {
    let server = MockServer::start().await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], Some(3))).await;
    mount_page(&server, Some(2), index_page(&[card("Kia Rio 2019", "2 F")], Some(3))).await;
    mount_page(&server, Some(3), index_page(&[card("Ford Ka 2010", "3 F")], Some(3))).await;

    let (lines, sink) = collecting_sink();
    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(sink);
    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, None, &CancellationToken::new())
        .await;

    assert_eq!(report.pages_requested, 3);
    assert_eq!(report.records.len(), 3);
    assert!(report.is_complete());
    // One discovery request plus one per page
    assert_eq!(request_count(&server).await, 4);

    let lines = lines.lock().unwrap();
    assert_eq!(lines[0], "Detecting total page count...");
    assert_eq!(lines[1], "3 pages detected");
}

#[tokio::test]
async fn test_discovery_falls_back_to_one_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], None)).await;

    let client = build_http_client(&test_fetcher_config()).unwrap();
    assert_eq!(
        discover_page_count(&client, &format!("{}/missing", server.uri())).await,
        1
    );
    assert_eq!(
        discover_page_count(&client, &format!("{}/cars", server.uri())).await,
        1
    );
}

#[tokio::test]
async fn test_content_less_card_is_kept_as_empty_record() {
    let server = MockServer::start().await;
    let cards = vec![
        card("Toyota Yaris 2018", "1 F"),
        r#"<div class="listings-cards__list-item">Annonce sponsorisée</div>"#.to_string(),
        card("Kia Rio 2019", "2 F"),
    ];
    mount_page(&server, None, index_page(&cards, None)).await;

    let (lines, sink) = collecting_sink();
    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(sink);
    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(1), &CancellationToken::new())
        .await;

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.skipped_listings, 0);
    assert!(report.is_complete());
    assert!(report.records[1].iter().all(|(_, value)| value.is_empty()));
    assert_eq!(report.records[2].get(fields::TITLE), Some("Kia Rio 2019"));
    assert!(!lines
        .lock()
        .unwrap()
        .iter()
        .any(|line| line.starts_with("Listing skipped")));
}

#[tokio::test]
async fn test_cancel_during_page_delay_keeps_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], None)).await;
    mount_page(&server, Some(2), index_page(&[card("Kia Rio 2019", "2 F")], None)).await;

    let config = FetcherConfig {
        page_delay_ms: 30_000,
        ..test_fetcher_config()
    };
    let (lines, sink) = collecting_sink();
    let coordinator = Coordinator::new(&config).unwrap().with_progress(sink);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            cancel.cancel();
        });
    }

    let base_url = format!("{}/cars", server.uri());
    let started = Instant::now();
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(2), &cancel)
        .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(report.duration() < chrono::Duration::seconds(10));
    assert_eq!(report.stop_reason, StopReason::Cancelled { page: 2 });
    assert_eq!(report.pages_scraped, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].get(fields::TITLE), Some("Toyota Yaris 2018"));
    assert_eq!(request_count(&server).await, 1);
    assert!(lines
        .lock()
        .unwrap()
        .contains(&"Scrape cancelled before page 2.".to_string()));
}

#[tokio::test]
async fn test_no_delay_after_last_page() {
    let server = MockServer::start().await;
    mount_page(&server, None, index_page(&[card("Toyota Yaris 2018", "1 F")], None)).await;

    let config = FetcherConfig {
        page_delay_ms: 30_000,
        ..test_fetcher_config()
    };
    let coordinator = Coordinator::new(&config)
        .unwrap()
        .with_progress(NoProgress);

    let base_url = format!("{}/cars", server.uri());
    let started = Instant::now();
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(1), &CancellationToken::new())
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.stop_reason, StopReason::Completed);
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_redirects_are_followed_and_user_agent_sent() {
    let server = MockServer::start().await;
    let target = format!("{}/cars", server.uri());
    Mock::given(method("GET"))
        .and(path("/old-cars"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cars"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(html(index_page(&[card("Toyota Yaris 2018", "1 F")], None)))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(NoProgress);
    let base_url = format!("{}/old-cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(1), &CancellationToken::new())
        .await;

    assert_eq!(report.stop_reason, StopReason::Completed);
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_scrape_clean_and_export() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        None,
        index_page(
            &[
                card("Toyota   Yaris 2018", "3 000 000 FCFA"),
                card("Kia Picanto", "Prix sur demande"),
            ],
            None,
        ),
    )
    .await;

    let coordinator = Coordinator::new(&test_fetcher_config())
        .unwrap()
        .with_progress(NoProgress);
    let base_url = format!("{}/cars", server.uri());
    let report = coordinator
        .run(Category::Vehicles, &base_url, Some(1), &CancellationToken::new())
        .await;

    let cleaned = report.cleaned();
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned[0].price_numeric, Some(3_000_000.0));
    assert_eq!(cleaned[0].year, Some(2018));
    assert_eq!(cleaned[0].get(fields::TITLE), Some("Toyota Yaris 2018"));
    assert_eq!(cleaned[0].distance_numeric, Some(50_000.0));
    assert_eq!(cleaned[1].price_numeric, None);
    assert_eq!(cleaned[1].year, None);

    let dir = tempfile::TempDir::new().unwrap();
    let mut output = listing_harvest::config::OutputConfig::default();
    output.cleaned_dir = dir.path().to_path_buf();
    let path = table_path(&output, Category::Vehicles, true);
    write_table(&path, &Table::cleaned(Category::Vehicles, &cleaned), ',').unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("title,brand,year,price,distance,transmission,fuel_type,address,price_numeric,distance_numeric")
    );
    assert_eq!(
        lines.next(),
        Some("Toyota Yaris 2018,Toyota,2018,3 000 000 FCFA,50 000 km,Manuelle,Diesel,Plateau Dakar,3000000,50000")
    );
    assert_eq!(
        lines.next(),
        Some("Kia Picanto,Kia,,Prix sur demande,50 000 km,Manuelle,Diesel,Plateau Dakar,,50000")
    );
}
