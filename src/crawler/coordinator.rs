//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the range loop that drives a crawl:
//! - Skipping pages the completion ledger already knows about
//! - Collecting item links for each results page
//! - Extracting and saving every item, isolating per-item faults
//! - Marking pages complete once every item has been attempted
//! - Honoring the stop signal at page and item boundaries

use crate::config::{Config, Politeness};
use crate::crawler::fields::extract_fields;
use crate::crawler::links::LinkCollector;
use crate::crawler::shutdown::StopSignal;
use crate::record::DocumentRecord;
use crate::render::{Renderer, RendererSession};
use crate::state::PageState;
use crate::storage::{Storage, StoreStats};
use crate::{ArchiveError, Result};
use std::time::{Duration, Instant};

/// Outcome of one `crawl_range` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages processed and marked complete in this run
    pub pages_completed: u64,
    /// Pages skipped because they were already complete
    pub pages_skipped: u64,
    /// Pages left unmarked after a fault
    pub pages_failed: u64,
    pub items_saved: u64,
    pub items_failed: u64,
    /// True if the stop signal ended the run early
    pub interrupted: bool,
    /// Store totals after the run
    pub stats: StoreStats,
}

/// Main crawler coordinator structure
///
/// Owns the store for the duration of a crawl. The renderer is handed to
/// `crawl_range` and released when the range ends, however it ends.
pub struct Coordinator<S: Storage> {
    storage: S,
    links: LinkCollector,
    politeness: Politeness,
}

impl<S: Storage> Coordinator<S> {
    /// Creates a new coordinator over `storage`
    ///
    /// # Arguments
    ///
    /// * `storage` - The persistence store to read the ledger from and save into
    /// * `config` - Archive addressing and politeness delays
    pub fn new(storage: S, config: &Config) -> Result<Self> {
        let politeness = config.crawler.politeness();
        Ok(Self {
            storage,
            links: LinkCollector::new(&config.archive, politeness.page_settle)?,
            politeness,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Crawls results pages `start..=end` in increasing order
    ///
    /// Page faults are logged and the page is left unmarked for a later run.
    /// A stop request ends the loop at the next page or item boundary. The
    /// renderer is released before the report is built.
    pub async fn crawl_range<R: Renderer>(
        &mut self,
        renderer: R,
        start: u32,
        end: u32,
        stop: &StopSignal,
    ) -> Result<CrawlReport> {
        let mut session = RendererSession::new(renderer);
        let mut report = CrawlReport::default();
        let started = Instant::now();

        if start > end {
            tracing::warn!("Empty page range {}..={}", start, end);
        }
        tracing::info!("Crawling results pages {} to {}", start, end);

        for page_number in start..=end {
            if stop.is_requested() {
                report.interrupted = true;
                tracing::warn!("Stopping before page {}", page_number);
                break;
            }

            match self
                .process_page(&mut *session, page_number, stop, &mut report)
                .await
            {
                Ok(PageState::Skipped) => report.pages_skipped += 1,
                Ok(_) => report.pages_completed += 1,
                Err(e) if e.is_cancelled() => {
                    report.interrupted = true;
                    tracing::warn!(
                        "Page {} interrupted; it will be retried on the next run",
                        page_number
                    );
                    break;
                }
                Err(e) => {
                    report.pages_failed += 1;
                    tracing::error!("Error processing page {}: {}", page_number, e);
                }
            }
        }

        session.finish();
        report.stats = self.storage.stats()?;

        tracing::info!(
            "Crawl {}: {} pages completed, {} skipped, {} failed, {} items saved, {} item faults in {}",
            if report.interrupted { "interrupted" } else { "finished" },
            report.pages_completed,
            report.pages_skipped,
            report.pages_failed,
            report.items_saved,
            report.items_failed,
            format_elapsed(started.elapsed())
        );

        Ok(report)
    }

    /// Processes a single results page
    ///
    /// Returns the terminal state reached: `Skipped` or `Completed`.
    async fn process_page<R: Renderer>(
        &mut self,
        renderer: &mut R,
        page_number: u32,
        stop: &StopSignal,
        report: &mut CrawlReport,
    ) -> Result<PageState> {
        let mut state = PageState::Pending;

        if self.storage.is_page_completed(page_number)? {
            advance(&mut state, PageState::Skipped)?;
            tracing::info!("Page {} already completed, skipping", page_number);
            return Ok(state);
        }

        let started = Instant::now();
        let links = self.links.collect(renderer, page_number).await?;
        advance(&mut state, PageState::LinksCollected)?;

        if !links.is_empty() {
            for (index, url) in links.iter().enumerate() {
                if stop.is_requested() {
                    return Err(ArchiveError::Cancelled);
                }

                let position = index + 1;
                match self.process_item(renderer, url, page_number, position).await {
                    Ok(()) => report.items_saved += 1,
                    Err(e) => {
                        report.items_failed += 1;
                        tracing::warn!(
                            "Error processing document {} on page {} ({}): {}",
                            position,
                            page_number,
                            url,
                            e
                        );
                    }
                }
            }
            advance(&mut state, PageState::ItemsProcessed)?;
        }

        self.storage.mark_page_completed(page_number)?;
        advance(&mut state, PageState::Completed)?;
        tracing::info!(
            "Page {} marked as completed ({})",
            page_number,
            format_elapsed(started.elapsed())
        );

        Ok(state)
    }

    /// Loads, extracts and saves one item
    async fn process_item<R: Renderer>(
        &mut self,
        renderer: &mut R,
        url: &str,
        page_number: u32,
        position: usize,
    ) -> Result<()> {
        tracing::info!("Processing document {} of page {}: {}", position, page_number, url);

        renderer.navigate(url).await?;
        tokio::time::sleep(self.politeness.item_settle).await;

        let record = DocumentRecord::new(url, extract_fields(&*renderer)).at(page_number, position);
        self.storage.upsert_item(&record)?;
        tracing::info!(
            "Saved: {}",
            record.fields.title.as_deref().unwrap_or("(untitled)")
        );

        tokio::time::sleep(self.politeness.item_cooldown).await;
        Ok(())
    }
}

fn advance(state: &mut PageState, next: PageState) -> Result<()> {
    if !state.can_transition_to(next) {
        return Err(ArchiveError::InvalidTransition {
            from: *state,
            to: next,
        });
    }
    tracing::trace!("Page state {} -> {}", state, next);
    *state = next;
    Ok(())
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
