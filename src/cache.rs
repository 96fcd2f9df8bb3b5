//! Thread-local memo of completed searches.
//!
//! Typing a term, extending it, then deleting back to the earlier term hits
//! the memo instead of rescanning. Keys are the raw search term; the page only
//! ever searches the one embedded dataset, so the dataset is not part of the key.
//!
//! Aborted scans are never stored.

use crate::{try_filter_results, AbortSignal, SailData, SearchError, SearchResult};
use log::debug;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Most searches kept before the oldest is evicted.
pub const MAX_CACHED_SEARCHES: usize = 128;

pub type CacheKey = String;
pub type CacheValue = Rc<Vec<SearchResult>>;

/// Bounded map that evicts in insertion order.
pub struct SearchMemo {
    entries: HashMap<CacheKey, CacheValue>,
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl SearchMemo {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheValue> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, value: CacheValue) {
        if self.entries.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                debug!("Evicting cached search: {}", oldest);
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

thread_local! {
    pub static SEARCH_CACHE: RefCell<SearchMemo> =
        RefCell::new(SearchMemo::with_capacity(MAX_CACHED_SEARCHES));
}

/// Memoized [`try_filter_results`]. A hit resolves without yielding.
pub async fn cached_filter_results(
    sail_data: &SailData,
    search_term: &str,
    abort_signal: Option<&AbortSignal>,
) -> Result<CacheValue, SearchError> {
    if let Some(hit) = SEARCH_CACHE.with(|c| c.borrow().get(search_term)) {
        debug!("Search cache hit for: {}", search_term);
        return Ok(hit);
    }

    let results = Rc::new(try_filter_results(sail_data, search_term, abort_signal).await?);
    SEARCH_CACHE.with(|c| {
        c.borrow_mut()
            .insert(search_term.to_string(), results.clone());
    });
    Ok(results)
}

pub fn len() -> usize {
    SEARCH_CACHE.with(|c| c.borrow().len())
}

pub fn clear() {
    SEARCH_CACHE.with(|c| c.borrow_mut().clear());
}
