//! Core of the sailboat search page: dataset, scoring and the cancelable,
//! cooperatively yielding filter loop. Nothing here depends on the UI layer.

use log::{debug, info};
use std::fmt;

pub mod cache;
pub mod dataset;
pub mod scheduler;
pub mod scoring;
pub mod signal;

pub use dataset::{get_sail_data, SailData, Sailboat};
pub use scoring::{score_match, SearchResult};
pub use signal::{AbortController, AbortSignal};

use scheduler::{yield_now, Stopwatch};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The signal fired before the scan finished; no partial results exist.
    Aborted { term: String },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Aborted { term } => write!(f, "Search for '{}' was aborted", term),
        }
    }
}

impl std::error::Error for SearchError {}

/// Scan `sail_data` for `search_term`, yielding to the event loop before each
/// boat and bailing out as soon as `abort_signal` fires.
///
/// An empty term returns immediately with no results. Matches are sorted by
/// ascending score; equal scores keep dataset order.
pub async fn try_filter_results(
    sail_data: &SailData,
    search_term: &str,
    abort_signal: Option<&AbortSignal>,
) -> Result<Vec<SearchResult>, SearchError> {
    if search_term.is_empty() {
        return Ok(Vec::new());
    }

    let watch = Stopwatch::start();
    let mut results = Vec::new();

    for boat in &sail_data.data {
        yield_now().await;

        if abort_signal.is_some_and(AbortSignal::aborted) {
            info!(
                "Abort filterResults for: {} ({:.1}ms)",
                search_term,
                watch.elapsed_ms()
            );
            return Err(SearchError::Aborted {
                term: search_term.to_string(),
            });
        }

        if let Some(result) = score_match(boat, search_term) {
            debug!("'{}' matched {} ({:.3})", search_term, boat.id, result.score);
            results.push(result);
        }
    }

    results.sort_by(|a, b| a.score.total_cmp(&b.score));

    info!(
        "Done filterResults for: {} ({} matches, {:.1}ms)",
        search_term,
        results.len(),
        watch.elapsed_ms()
    );
    Ok(results)
}

/// Like [`try_filter_results`], but an aborted search is just an empty result set.
pub async fn filter_results(
    sail_data: &SailData,
    search_term: &str,
    abort_signal: Option<&AbortSignal>,
) -> Vec<SearchResult> {
    try_filter_results(sail_data, search_term, abort_signal)
        .await
        .unwrap_or_default()
}
