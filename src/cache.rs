//! Explicit cache for the show catalog.
//!
//! The catalog is loaded once per process unless refreshed or invalidated. Loading holds
//! the lock, so at most one loader runs and readers wait for it to finish.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::ShowRecord;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct CatalogCache {
    shows: Mutex<Option<Arc<Vec<ShowRecord>>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog, running `loader` if nothing is cached yet.
    ///
    /// An empty result is returned to the caller but not cached.
    pub async fn get_or_load<F, Fut>(&self, loader: F) -> Result<Arc<Vec<ShowRecord>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ShowRecord>>>,
    {
        let mut guard = self.shows.lock().await;
        if let Some(shows) = guard.as_ref() {
            debug!("Catalog served from cache ({} shows)", shows.len());
            return Ok(Arc::clone(shows));
        }
        Self::store(&mut guard, loader().await?)
    }

    /// Run `loader` unconditionally and replace the cached catalog.
    pub async fn refresh<F, Fut>(&self, loader: F) -> Result<Arc<Vec<ShowRecord>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ShowRecord>>>,
    {
        let mut guard = self.shows.lock().await;
        *guard = None;
        Self::store(&mut guard, loader().await?)
    }

    pub async fn invalidate(&self) {
        *self.shows.lock().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.shows.lock().await.is_some()
    }

    fn store(
        slot: &mut Option<Arc<Vec<ShowRecord>>>,
        shows: Vec<ShowRecord>,
    ) -> Result<Arc<Vec<ShowRecord>>> {
        let shows = Arc::new(shows);
        if !shows.is_empty() {
            *slot = Some(Arc::clone(&shows));
        }
        Ok(shows)
    }
}

/// Shows whose title contains `query`, ignoring case, in catalog order.
pub fn search<'a>(shows: &'a [ShowRecord], query: &str) -> Vec<&'a ShowRecord> {
    let needle = query.trim().to_lowercase();
    shows
        .iter()
        .filter(|show| show.title.to_lowercase().contains(&needle))
        .collect()
}

/// First show whose title equals `title` exactly.
pub fn find_show<'a>(shows: &'a [ShowRecord], title: &str) -> Option<&'a ShowRecord> {
    let title = title.trim();
    shows.iter().find(|show| show.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn show(title: &str, maze: &str) -> ShowRecord {
        ShowRecord {
            title: title.to_string(),
            directory: String::new(),
            tvrage: String::new(),
            tvmaze: maze.to_string(),
            start_date: String::new(),
            end_date: String::new(),
            number_of_episodes: String::new(),
            run_time: String::new(),
            network: String::new(),
            country: String::new(),
            on_hiatus: String::new(),
            on_hiatus_desc: String::new(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let shows = vec![show("The Office", "1"), show("Office Space", "2"), show("Lost", "3")];
        let hits: Vec<_> = search(&shows, "OFFICE").into_iter().map(|s| s.tvmaze.as_str()).collect();
        assert_eq!(hits, ["1", "2"]);
    }

    #[test]
    fn test_find_show_first_match_wins() {
        let shows = vec![show("Dup", "1"), show("Dup", "2")];
        assert_eq!(find_show(&shows, "Dup").unwrap().tvmaze, "1");
        assert!(find_show(&shows, "dup").is_none());
    }

    #[tokio::test]
    async fn test_loader_runs_once_until_invalidated() {
        let cache = CatalogCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, crate::error::Error>(vec![show("A", "1")])
        };

        cache.get_or_load(load).await.unwrap();
        cache.get_or_load(load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_loaded().await);

        cache.invalidate().await;
        assert!(!cache.is_loaded().await);
        cache.get_or_load(load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.refresh(load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_not_cached() {
        let cache = CatalogCache::new();
        let shows = cache.get_or_load(|| async { Ok::<_, crate::error::Error>(Vec::new()) }).await.unwrap();
        assert!(shows.is_empty());
        assert!(!cache.is_loaded().await);
    }
}
