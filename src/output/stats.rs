//! Statistics display for the harvester database
//!
//! This module provides functionality for loading store totals and
//! printing them, together with the outcome of a crawl run.

use crate::crawler::CrawlReport;
use crate::storage::{Storage, StoreStats};
use crate::Result;

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStats)` - Document and completed-page counts
/// * `Err(ArchiveError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStats> {
    Ok(storage.stats()?)
}

/// Formats store totals for display
pub fn format_statistics(stats: &StoreStats) -> String {
    format!(
        "=== Database Statistics ===\n  Documents stored: {}\n  Pages completed: {}",
        stats.item_count, stats.completed_page_count
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStats) {
    println!("{}", format_statistics(stats));
}

/// Prints the outcome of a crawl, followed by the store totals
pub fn print_report(report: &CrawlReport) {
    if report.interrupted {
        println!("Crawl interrupted by user.\n");
    } else {
        println!("Crawl finished.\n");
    }

    println!("This run:");
    println!("  Pages completed: {}", report.pages_completed);
    println!("  Pages skipped (already done): {}", report.pages_skipped);
    println!("  Pages failed: {}", report.pages_failed);
    println!("  Documents saved: {}", report.items_saved);
    println!("  Document errors: {}", report.items_failed);
    println!();

    print_statistics(&report.stats);
}
