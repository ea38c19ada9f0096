//! State module for tracking crawl progress
//!
//! - `PageState`: the per-page state machine the coordinator steps through

mod page_state;

pub use page_state::PageState;
