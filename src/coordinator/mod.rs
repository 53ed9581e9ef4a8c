//! Batch download coordination -- bounded fan-out of page fetches.
//!
//! - [`batch`] - Directory setup, bounded dispatch and wait-for-all
//! - [`report`] - Aggregation of per-page results into a [`BatchReport`](crate::types::BatchReport)

mod batch;
mod report;


pub use batch::{BatchParams, download_pages};
