//! Remote catalog trait and implementations for fetching pages of records.

pub mod artic;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::{FetchError, Page};

pub use artic::ArticCatalog;

/// A paginated record source.
pub trait CatalogSource: Send + Sync {
    /// Human-readable name of this source (e.g., "Art Institute of Chicago").
    fn name(&self) -> &str;

    /// Fetch page `page` (1-indexed) holding at most `limit` records.
    fn fetch_page<'a>(
        &'a self,
        page: u32,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>>;
}
