use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for the harvester
///
/// Every table and key has a default, so an empty file (or no file at all)
/// yields a configuration that targets the Wilson Center Digital Archive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the archive lives and how its pages are addressed
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Base address used to resolve relative item links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Search results address; `{page}` is replaced with the page number
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Path fragment every item link must contain
    #[serde(rename = "item-path")]
    pub item_path: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://digitalarchive.wilsoncenter.org".to_string(),
            search_url: "https://digitalarchive.wilsoncenter.org/search?page={page}".to_string(),
            item_path: "/document/".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Returns the address of a search results page
    pub fn page_url(&self, page_number: u32) -> String {
        self.search_url.replace("{page}", &page_number.to_string())
    }
}

/// Crawl range and politeness delays
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First page of the range (inclusive)
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Last page of the range (inclusive)
    #[serde(rename = "end-page")]
    pub end_page: u32,

    /// Pause after navigating to a results page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Pause after navigating to an item page (milliseconds)
    #[serde(rename = "item-delay-ms")]
    pub item_delay_ms: u64,

    /// Pause after saving an item (milliseconds)
    #[serde(rename = "item-cooldown-ms")]
    pub item_cooldown_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_page: 0,
            end_page: 1615,
            page_delay_ms: 5000,
            item_delay_ms: 3000,
            item_cooldown_ms: 1000,
        }
    }
}

impl CrawlerConfig {
    pub fn politeness(&self) -> Politeness {
        Politeness {
            page_settle: Duration::from_millis(self.page_delay_ms),
            item_settle: Duration::from_millis(self.item_delay_ms),
            item_cooldown: Duration::from_millis(self.item_cooldown_ms),
        }
    }
}

/// Fixed pauses inserted around navigations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Politeness {
    pub page_settle: Duration,
    pub item_settle: Duration,
    pub item_cooldown: Duration,
}

/// HTTP renderer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("archive-harvester/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path of the CSV export
    #[serde(rename = "export-path")]
    pub export_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "wilson_archive.db".to_string(),
            export_path: "wilson_archive.csv".to_string(),
        }
    }
}
