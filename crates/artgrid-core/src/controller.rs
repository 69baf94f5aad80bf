//! The selection controller: one visible page, a selection spanning all pages,
//! and deferred auto-selection that carries over to later fetches.
//!
//! Fetching is split into [`begin_fetch`](SelectionController::begin_fetch),
//! [`apply_page`](SelectionController::apply_page) and
//! [`fail_fetch`](SelectionController::fail_fetch) so a UI can run the network
//! call on a background task. Every fetch gets a [`FetchTicket`]; only the
//! most recently issued ticket may change state, so a slow response to an
//! earlier page request can never overwrite a newer one.

use std::sync::Arc;

use crate::catalog::CatalogSource;
use crate::selection::SelectionSet;
use crate::store::{KeyValueStore, StateStore};
use crate::{FetchError, Page, Record, RecordId};

/// Identifies one page request. Issued by `begin_fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u32,
}

pub struct SelectionController<K> {
    catalog: Arc<dyn CatalogSource>,
    store: StateStore<K>,
    page_size: u32,

    records: Vec<Record>,
    selection: SelectionSet,
    current_page: u32,
    total_records: u64,

    pending_auto_select: usize,
    loading: bool,
    latest_seq: u64,
    last_error: Option<String>,
}

impl<K: KeyValueStore> SelectionController<K> {
    /// Build a controller, rehydrating selection and page from `store`.
    ///
    /// Storage read failures are logged and treated as an empty state.
    pub fn new(catalog: Arc<dyn CatalogSource>, store: StateStore<K>, page_size: u32) -> Self {
        let selection = store.load_selection().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read persisted selection");
            SelectionSet::new()
        });
        let current_page = store.load_page().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read persisted page");
            1
        });
        tracing::debug!(
            selected = selection.len(),
            page = current_page,
            "rehydrated selection state"
        );

        Self {
            catalog,
            store,
            page_size: page_size.max(1),
            records: Vec::new(),
            selection,
            current_page,
            total_records: 0,
            pending_auto_select: 0,
            loading: false,
            latest_seq: 0,
            last_error: None,
        }
    }

    pub fn catalog(&self) -> Arc<dyn CatalogSource> {
        Arc::clone(&self.catalog)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Records of the page currently shown.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Number of pages the source reports, zero before the first fetch.
    pub fn total_pages(&self) -> u32 {
        let size = self.page_size as u64;
        self.total_records.div_ceil(size).min(u32::MAX as u64) as u32
    }

    pub fn pending_auto_select(&self) -> usize {
        self.pending_auto_select
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// "{first} to {last} of {total}" for the visible page.
    pub fn page_report(&self) -> String {
        if self.records.is_empty() {
            return format!("0 to 0 of {}", self.total_records);
        }
        let first = (self.current_page as u64 - 1) * self.page_size as u64 + 1;
        let last = first + self.records.len() as u64 - 1;
        format!("{} to {} of {}", first, last, self.total_records)
    }

    /// Start a fetch of `page` and return its ticket. Any earlier ticket
    /// becomes stale.
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        self.latest_seq += 1;
        self.loading = true;
        let ticket = FetchTicket {
            seq: self.latest_seq,
            page: page.max(1),
        };
        tracing::debug!(seq = ticket.seq, page = ticket.page, "fetch started");
        ticket
    }

    fn is_stale(&self, ticket: FetchTicket) -> bool {
        ticket.seq != self.latest_seq
    }

    /// Apply a successful response. Returns `false` (and changes nothing) if
    /// the ticket is stale.
    ///
    /// Replaces the visible rows, updates the total, moves the current page,
    /// spends pending auto-selection on rows not yet selected, then persists
    /// selection and page.
    pub fn apply_page(&mut self, ticket: FetchTicket, page: Page) -> bool {
        if self.is_stale(ticket) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                page = ticket.page,
                "discarding stale page response"
            );
            return false;
        }

        self.records = page.records;
        self.total_records = page.total;
        self.current_page = ticket.page;
        self.loading = false;
        self.last_error = None;

        if self.pending_auto_select > 0 {
            let budget = self.pending_auto_select.min(self.page_size as usize);
            let added = self.selection.auto_select(&self.records, budget);
            self.pending_auto_select -= added;
            tracing::info!(
                page = ticket.page,
                added,
                remaining = self.pending_auto_select,
                "auto-selected rows"
            );
        }

        tracing::info!(
            page = ticket.page,
            rows = self.records.len(),
            total = self.total_records,
            "page loaded"
        );

        self.persist_selection();
        self.persist_page();
        true
    }

    /// Record a failed fetch. Prior rows, page and selection are kept. Returns
    /// `false` if the ticket is stale.
    pub fn fail_fetch(&mut self, ticket: FetchTicket, err: &FetchError) -> bool {
        if self.is_stale(ticket) {
            tracing::debug!(seq = ticket.seq, error = %err, "ignoring stale fetch failure");
            return false;
        }
        tracing::warn!(page = ticket.page, error = %err, "error fetching page");
        self.loading = false;
        self.last_error = Some(err.to_string());
        true
    }

    /// Fetch `page` from the catalog and apply the result.
    pub async fn fetch_page(&mut self, page: u32) -> Result<(), FetchError> {
        let ticket = self.begin_fetch(page);
        let catalog = self.catalog();
        match catalog.fetch_page(ticket.page, self.page_size).await {
            Ok(p) => {
                self.apply_page(ticket, p);
                Ok(())
            }
            Err(e) => {
                self.fail_fetch(ticket, &e);
                Err(e)
            }
        }
    }

    /// Reconcile the selection with the rows checked on the visible page.
    ///
    /// Every visible row is selected if it appears in `visible_selected` and
    /// deselected otherwise; rows on other pages are left alone.
    pub fn set_selection(&mut self, visible_selected: &[RecordId]) {
        self.selection.reconcile(&self.records, visible_selected);
        tracing::debug!(
            visible = visible_selected.len(),
            total = self.selection.len(),
            "selection changed"
        );
        self.persist_selection();
    }

    /// Arm auto-selection of `count` rows and start a refetch of the current
    /// page, which spends as much of `count` as it can. Whatever is left is
    /// spent by subsequent fetches. A count of zero disarms it.
    pub fn request_auto_select(&mut self, count: usize) -> FetchTicket {
        self.pending_auto_select = count;
        tracing::info!(count, page = self.current_page, "auto-select requested");
        self.begin_fetch(self.current_page)
    }

    /// [`request_auto_select`](Self::request_auto_select) followed by the refetch.
    pub async fn auto_select(&mut self, count: usize) -> Result<(), FetchError> {
        let ticket = self.request_auto_select(count);
        let catalog = self.catalog();
        match catalog.fetch_page(ticket.page, self.page_size).await {
            Ok(p) => {
                self.apply_page(ticket, p);
                Ok(())
            }
            Err(e) => {
                self.fail_fetch(ticket, &e);
                Err(e)
            }
        }
    }

    /// Visible rows that are selected, in page order.
    pub fn visible_selection(&self) -> Vec<&Record> {
        self.selection.visible(&self.records)
    }

    fn persist_selection(&self) {
        if let Err(e) = self.store.save_selection(&self.selection) {
            tracing::warn!(error = %e, "failed to persist selection");
        }
    }

    fn persist_page(&self) {
        if let Err(e) = self.store.save_page(self.current_page) {
            tracing::warn!(error = %e, "failed to persist current page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::MockCatalog;
    use crate::store::MemoryStore;

    fn controller(n: usize) -> (SelectionController<MemoryStore>, Arc<MockCatalog>) {
        let mock = Arc::new(MockCatalog::numbered(n));
        let ctl = SelectionController::new(mock.clone(), StateStore::new(MemoryStore::new()), 12);
        (ctl, mock)
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let (mut ctl, mock) = controller(40);
        let first = ctl.begin_fetch(1);
        let second = ctl.begin_fetch(2);

        assert!(ctl.apply_page(second, mock.page(2, 12)));
        assert!(!ctl.apply_page(first, mock.page(1, 12)));

        assert_eq!(ctl.current_page(), 2);
        assert_eq!(ctl.records()[0].key(), "13");
    }

    #[test]
    fn stale_response_does_not_clear_loading() {
        let (mut ctl, mock) = controller(40);
        let first = ctl.begin_fetch(1);
        let _second = ctl.begin_fetch(2);
        ctl.apply_page(first, mock.page(1, 12));
        assert!(ctl.is_loading());
        assert!(!ctl.fail_fetch(first, &FetchError::Status(500)));
        assert!(ctl.is_loading());
    }

    #[test]
    fn failure_keeps_previous_page() {
        let (mut ctl, mock) = controller(40);
        let t = ctl.begin_fetch(1);
        ctl.apply_page(t, mock.page(1, 12));

        let t = ctl.begin_fetch(2);
        assert!(ctl.fail_fetch(t, &FetchError::Status(502)));
        assert!(!ctl.is_loading());
        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.records().len(), 12);
        assert_eq!(ctl.last_error(), Some("HTTP 502"));
    }

    #[test]
    fn page_report_and_total_pages() {
        let (mut ctl, mock) = controller(30);
        assert_eq!(ctl.total_pages(), 0);
        assert_eq!(ctl.page_report(), "0 to 0 of 0");

        let t = ctl.begin_fetch(3);
        ctl.apply_page(t, mock.page(3, 12));
        assert_eq!(ctl.total_pages(), 3);
        assert_eq!(ctl.page_report(), "25 to 30 of 30");
    }

    #[test]
    fn set_selection_persists_immediately() {
        let kv = MemoryStore::new();
        let mock = Arc::new(MockCatalog::numbered(12));
        let mut ctl = SelectionController::new(mock.clone(), StateStore::new(kv.clone()), 12);
        let t = ctl.begin_fetch(1);
        ctl.apply_page(t, mock.page(1, 12));

        ctl.set_selection(&[RecordId::Number(3)]);
        let reloaded = StateStore::new(kv).load_selection().unwrap();
        assert!(reloaded.contains(&RecordId::Number(3)));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn zero_auto_select_disarms() {
        let (mut ctl, mock) = controller(30);
        let t = ctl.request_auto_select(5);
        ctl.apply_page(t, mock.page(1, 12));
        assert_eq!(ctl.selection().len(), 5);

        let t = ctl.request_auto_select(0);
        assert_eq!(ctl.pending_auto_select(), 0);
        ctl.apply_page(t, mock.page(1, 12));
        assert_eq!(ctl.selection().len(), 5);
    }

    #[test]
    fn page_zero_is_clamped() {
        let (mut ctl, _) = controller(1);
        assert_eq!(ctl.begin_fetch(0).page, 1);
    }
}
