//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the archive and run the real
//! HTTP renderer, coordinator and SQLite store end-to-end.

use archive_harvester::config::{ArchiveConfig, Config, CrawlerConfig, OutputConfig};
use archive_harvester::crawler::{Coordinator, StopSignal};
use archive_harvester::output::{export_csv, DISPLAY_PAGE_COLUMN};
use archive_harvester::render::HttpRenderer;
use archive_harvester::storage::{SqliteStorage, Storage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock archive, with no delays
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        archive: ArchiveConfig {
            base_url: base_url.to_string(),
            search_url: format!("{}/search?page={{page}}", base_url),
            item_path: "/document/".to_string(),
        },
        crawler: CrawlerConfig {
            start_page: 0,
            end_page: 1,
            page_delay_ms: 0,
            item_delay_ms: 0,
            item_cooldown_ms: 0,
        },
        output: OutputConfig {
            database_path: dir.join("archive.db").display().to_string(),
            export_path: dir.join("archive.csv").display().to_string(),
        },
        ..Config::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn results_body(ids: &[u32]) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<tr><td class="document contextual-region"><a href="/document/{}">Document {}</a></td></tr>"#,
                id, id
            )
        })
        .collect();
    format!("<table>{}</table>", rows)
}

fn document_body(id: u32) -> String {
    format!(
        r#"<h1 class="title">Document {id}</h1>
        <span class="date">March {id}, 1953</span>
        <h2 class="title">Subjects Discussed</h2>
        <div><a class="pill"><span class="name"><span>Subject {id}</span></span></a></div>
        <div class="information-block"><div class="sub-title">Record ID</div><div class="text">{id}</div></div>"#,
        id = id
    )
}

async fn mount_results_page(server: &MockServer, page: u32, ids: &[u32]) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(html(results_body(ids)))
        .mount(server)
        .await;
}

async fn mount_document(server: &MockServer, id: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/document/{}", id)))
        .respond_with(html(document_body(id)))
        .mount(server)
        .await;
}

/// Page 0 lists documents 1-3, page 1 lists document 4
async fn mount_archive(server: &MockServer) {
    mount_results_page(server, 0, &[1, 2, 3]).await;
    mount_results_page(server, 1, &[4]).await;
    for id in 1..=4 {
        mount_document(server, id).await;
    }
}

async fn crawl(config: &Config, stop: &StopSignal) -> archive_harvester::CrawlReport {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .expect("Failed to open storage");
    let renderer = HttpRenderer::new(&config.renderer).expect("Failed to build renderer");
    let mut coordinator = Coordinator::new(storage, config).expect("Failed to build coordinator");
    coordinator
        .crawl_range(
            renderer,
            config.crawler.start_page,
            config.crawler.end_page,
            stop,
        )
        .await
        .expect("Crawl failed")
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_full_crawl_and_export() {
    let mock_server = MockServer::start().await;
    mount_archive(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let report = crawl(&config, &StopSignal::new()).await;
    assert_eq!(report.pages_completed, 2);
    assert_eq!(report.items_saved, 4);
    assert_eq!(report.stats.item_count, 4);
    assert_eq!(report.stats.completed_page_count, 2);

    // Reopen the database to check what was committed
    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.completed_pages().unwrap(), vec![0, 1]);

    let url = format!("{}/document/2", mock_server.uri());
    let record = storage.get_item(&url).unwrap().expect("document 2 missing");
    assert_eq!(record.page_number, Some(0));
    assert_eq!(record.page_position, Some(2));
    assert_eq!(record.fields.title.as_deref(), Some("Document 2"));
    assert_eq!(record.fields.original_publication_date.as_deref(), Some("March 2, 1953"));
    assert_eq!(record.fields.subjects_discussed, Some(vec!["Subject 2".to_string()]));
    assert_eq!(record.fields.record_id.as_deref(), Some("2"));
    assert_eq!(record.fields.authors, None);

    let export_path = Path::new(&config.output.export_path);
    assert_eq!(export_csv(&storage, export_path).unwrap(), 4);

    let mut reader = csv::Reader::from_path(export_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let page_col = headers.iter().position(|h| h == "page_number").unwrap();
    assert_eq!(&headers[page_col + 1], DISPLAY_PAGE_COLUMN);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0][0].ends_with("/document/1"));
    assert_eq!(&rows[0][page_col + 1], "1");
    assert!(rows[3][0].ends_with("/document/4"));
    assert_eq!(&rows[3][page_col + 1], "2");
}

#[tokio::test]
async fn test_resume_skips_completed_pages() {
    let mock_server = MockServer::start().await;
    mount_archive(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    crawl(&config, &StopSignal::new()).await;
    let after_first = request_count(&mock_server).await;
    assert_eq!(after_first, 6);

    let report = crawl(&config, &StopSignal::new()).await;
    assert_eq!(report.pages_skipped, 2);
    assert_eq!(report.pages_completed, 0);
    assert_eq!(report.stats.item_count, 4);
    assert_eq!(request_count(&mock_server).await, after_first);
}

#[tokio::test]
async fn test_failed_document_does_not_block_page() {
    let mock_server = MockServer::start().await;
    mount_results_page(&mock_server, 0, &[1, 2, 3]).await;
    mount_results_page(&mock_server, 1, &[]).await;
    mount_document(&mock_server, 1).await;
    mount_document(&mock_server, 3).await;
    Mock::given(method("GET"))
        .and(path("/document/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let report = crawl(&config, &StopSignal::new()).await;
    assert_eq!(report.items_saved, 2);
    assert_eq!(report.items_failed, 1);
    assert_eq!(report.pages_completed, 2);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let uri = mock_server.uri();
    assert!(storage.get_item(&format!("{}/document/1", uri)).unwrap().is_some());
    assert!(storage.get_item(&format!("{}/document/2", uri)).unwrap().is_none());
    assert!(storage.get_item(&format!("{}/document/3", uri)).unwrap().is_some());

    // Page 1 had no documents but still counts as done
    assert!(storage.is_page_completed(1).unwrap());
}

#[tokio::test]
async fn test_failed_results_page_is_retried_on_next_run() {
    let mock_server = MockServer::start().await;

    // The first request for page 0 fails; later ones succeed
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_archive(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let first = crawl(&config, &StopSignal::new()).await;
    assert_eq!(first.pages_failed, 1);
    assert_eq!(first.pages_completed, 1);
    assert_eq!(first.stats.item_count, 1);

    let second = crawl(&config, &StopSignal::new()).await;
    assert_eq!(second.pages_failed, 0);
    assert_eq!(second.pages_completed, 1);
    assert_eq!(second.pages_skipped, 1);
    assert_eq!(second.stats.item_count, 4);
    assert_eq!(second.stats.completed_page_count, 2);
}

#[tokio::test]
async fn test_stop_before_start_makes_no_requests() {
    let mock_server = MockServer::start().await;
    mount_archive(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let stop = StopSignal::new();
    stop.request();
    let report = crawl(&config, &stop).await;

    assert!(report.interrupted);
    assert_eq!(report.stats.completed_page_count, 0);
    assert_eq!(request_count(&mock_server).await, 0);
}
