//! Output module for exporting harvested data and reporting
//!
//! This module handles:
//! - Exporting the document table to CSV with a derived display page column
//! - Printing store statistics and crawl outcomes

mod csv_export;
pub mod stats;

pub use csv_export::{export_csv, export_header, write_csv, DISPLAY_PAGE_COLUMN};
pub use stats::{format_statistics, load_statistics, print_report, print_statistics};
