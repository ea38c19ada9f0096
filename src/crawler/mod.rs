//! Crawler module for harvesting documents page by page
//!
//! This module contains the core crawling logic, including:
//! - Link collection from search-result pages
//! - Field extraction with selector fallback chains
//! - Page-range coordination with resumable progress
//! - Cooperative cancellation

mod coordinator;
mod extractor;
mod fields;
mod links;
mod shutdown;

pub use coordinator::{Coordinator, CrawlReport};
pub use extractor::{direct_text, extract_field, information_block, tag_list, FallbackChain};
pub use fields::extract_fields;
pub use links::{LinkCollector, LINK_SELECTORS};
pub use shutdown::{watch_interrupts, StopSignal};

use crate::config::Config;
use crate::render::HttpRenderer;
use crate::storage::open_storage;
use crate::Result;
use std::path::Path;

/// Runs a complete crawl over the configured page range
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open (or create) the database; failure here aborts before any fetch
/// 2. Build the HTTP renderer
/// 3. Walk `start-page..=end-page`, skipping pages already completed
/// 4. Release the renderer and report the store totals
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `stop` - Signal that ends the crawl at the next safe point
///
/// # Example
///
/// ```no_run
/// use archive_harvester::config::load_config;
/// use archive_harvester::crawler::{run_crawl, StopSignal};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvester.toml"))?;
/// let report = run_crawl(&config, &StopSignal::new()).await?;
/// println!("{} documents stored", report.stats.item_count);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, stop: &StopSignal) -> Result<CrawlReport> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let renderer = HttpRenderer::new(&config.renderer)?;
    let mut coordinator = Coordinator::new(storage, config)?;

    coordinator
        .crawl_range(
            renderer,
            config.crawler.start_page,
            config.crawler.end_page,
            stop,
        )
        .await
}
