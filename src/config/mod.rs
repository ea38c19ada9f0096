//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use archive_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Crawling pages {}..={}", config.crawler.start_page, config.crawler.end_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArchiveConfig, Config, CrawlerConfig, OutputConfig, Politeness, RendererConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
