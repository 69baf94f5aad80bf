//! In-memory catalog for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::CatalogSource;
use crate::{FetchError, Page, Record};

/// A hand-rolled mock implementing [`CatalogSource`] over a fixed record list.
///
/// Supports:
/// - Slicing `records` into pages exactly like the remote API would.
/// - Scripted failures for specific page numbers.
/// - Optional per-call latency.
/// - Call counting via [`call_count()`](MockCatalog::call_count).
pub struct MockCatalog {
    records: Vec<Record>,
    failing_pages: Mutex<Vec<u32>>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
}

impl MockCatalog {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            failing_pages: Mutex::new(Vec::new()),
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Catalog of `n` records with numeric ids `1..=n`.
    pub fn numbered(n: usize) -> Self {
        let records = (1..=n as i64)
            .map(|i| Record::new(i, format!("Artwork {}", i)))
            .collect();
        Self::new(records)
    }

    /// Make every fetch of `page` fail with HTTP 503 until [`heal`](Self::heal) is called.
    pub fn fail_page(self, page: u32) -> Self {
        if let Ok(mut pages) = self.failing_pages.lock() {
            pages.push(page);
        }
        self
    }

    /// Stop failing any page.
    pub fn heal(&self) {
        if let Ok(mut pages) = self.failing_pages.lock() {
            pages.clear();
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `fetch_page()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The page the remote API would return, without counting a call.
    pub fn page(&self, page: u32, limit: u32) -> Page {
        let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let records = self
            .records
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        Page {
            records,
            total: self.records.len() as u64,
        }
    }

    fn is_failing(&self, page: u32) -> bool {
        self.failing_pages
            .lock()
            .map(|pages| pages.contains(&page))
            .unwrap_or(false)
    }
}

impl CatalogSource for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_page<'a>(
        &'a self,
        page: u32,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let failing = self.is_failing(page);
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            if failing {
                return Err(FetchError::Status(503));
            }
            Ok(self.page(page, limit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slices_pages_like_the_api() {
        let mock = MockCatalog::numbered(30);
        let page = mock.fetch_page(3, 12).await.unwrap();
        assert_eq!(page.total, 30);
        assert_eq!(page.records.len(), 6);
        assert_eq!(page.records[0].key(), "25");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_failure_then_heal() {
        let mock = MockCatalog::numbered(5).fail_page(1);
        assert!(matches!(
            mock.fetch_page(1, 12).await,
            Err(FetchError::Status(503))
        ));
        mock.heal();
        assert_eq!(mock.fetch_page(1, 12).await.unwrap().records.len(), 5);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let mock = MockCatalog::numbered(5);
        assert!(mock.page(4, 12).records.is_empty());
    }
}
