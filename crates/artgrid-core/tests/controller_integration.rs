//! Integration tests for the [`SelectionController`].
//!
//! The catalog is a [`MockCatalog`] so no HTTP requests are made; state goes
//! through a [`MemoryStore`] (or a [`FileStore`] in a temp dir) so restarts
//! can be simulated by building a second controller over the same store.

use std::sync::Arc;
use std::time::Duration;

use artgrid_core::catalog::mock::MockCatalog;
use artgrid_core::{
    FileStore, MemoryStore, RecordId, SelectionController, SelectionSet, StateStore,
};

const PAGE_SIZE: u32 = 12;

fn controller_over(
    mock: Arc<MockCatalog>,
    kv: MemoryStore,
) -> SelectionController<MemoryStore> {
    SelectionController::new(mock, StateStore::new(kv), PAGE_SIZE)
}

fn num(ids: &[i64]) -> Vec<RecordId> {
    ids.iter().map(|&i| RecordId::Number(i)).collect()
}

fn visible_keys(ctl: &SelectionController<MemoryStore>) -> Vec<String> {
    ctl.visible_selection().iter().map(|r| r.key()).collect()
}

#[tokio::test]
async fn auto_select_spans_two_pages() {
    let mock = Arc::new(MockCatalog::numbered(100));
    let mut ctl = controller_over(mock, MemoryStore::new());
    ctl.fetch_page(1).await.unwrap();
    assert!(ctl.selection().is_empty());

    ctl.auto_select(15).await.unwrap();
    assert_eq!(ctl.selection().len(), 12);
    assert_eq!(ctl.pending_auto_select(), 3);

    ctl.fetch_page(2).await.unwrap();
    assert_eq!(ctl.selection().len(), 15);
    assert_eq!(ctl.pending_auto_select(), 0);
    assert_eq!(visible_keys(&ctl), vec!["13", "14", "15"]);

    // Idle afterwards: further fetches add nothing.
    ctl.fetch_page(3).await.unwrap();
    assert_eq!(ctl.selection().len(), 15);
}

#[tokio::test]
async fn manual_selection_survives_navigation() {
    let mock = Arc::new(MockCatalog::numbered(100));
    let mut ctl = controller_over(mock, MemoryStore::new());

    ctl.fetch_page(1).await.unwrap();
    ctl.set_selection(&num(&[2, 5]));

    ctl.fetch_page(2).await.unwrap();
    ctl.set_selection(&num(&[20]));
    assert_eq!(ctl.selection().len(), 3);

    ctl.fetch_page(1).await.unwrap();
    assert_eq!(visible_keys(&ctl), vec!["2", "5"]);
}

#[tokio::test]
async fn fetch_never_shrinks_selection() {
    let mock = Arc::new(MockCatalog::numbered(60));
    let mut ctl = controller_over(mock, MemoryStore::new());
    ctl.fetch_page(1).await.unwrap();
    ctl.set_selection(&num(&[1, 3, 7]));
    ctl.request_auto_select(20);

    let mut before: SelectionSet = ctl.selection().clone();
    for page in [1, 2, 5, 3, 2, 9, 1] {
        let _ = ctl.fetch_page(page).await;
        for key in before.keys() {
            assert!(ctl.selection().contains_key(key), "lost {key} on page {page}");
        }
        before = ctl.selection().clone();
    }
}

#[tokio::test]
async fn set_selection_leaves_other_pages_alone() {
    let mock = Arc::new(MockCatalog::numbered(60));
    let mut ctl = controller_over(mock, MemoryStore::new());
    ctl.fetch_page(2).await.unwrap();
    ctl.set_selection(&num(&[13, 14]));

    ctl.fetch_page(1).await.unwrap();
    // Clear page 1 entirely and name ids from page 2 that must be ignored.
    ctl.set_selection(&num(&[14, 15]));
    assert!(ctl.selection().contains(&RecordId::Number(13)));
    assert!(ctl.selection().contains(&RecordId::Number(14)));
    assert!(!ctl.selection().contains(&RecordId::Number(15)));
    assert_eq!(ctl.selection().len(), 2);
}

#[tokio::test]
async fn auto_select_counts_only_new_rows() {
    let mock = Arc::new(MockCatalog::numbered(100));
    let mut ctl = controller_over(mock, MemoryStore::new());
    ctl.fetch_page(1).await.unwrap();
    ctl.set_selection(&num(&[1, 2, 3, 4]));

    // 8 of the 12 rows on page 1 are unselected; 10 requested.
    ctl.auto_select(10).await.unwrap();
    assert_eq!(ctl.selection().len(), 12);
    assert_eq!(ctl.pending_auto_select(), 2);

    // Re-fetching a fully selected page spends nothing.
    ctl.fetch_page(1).await.unwrap();
    assert_eq!(ctl.pending_auto_select(), 2);

    ctl.fetch_page(2).await.unwrap();
    assert_eq!(ctl.pending_auto_select(), 0);
    assert_eq!(visible_keys(&ctl), vec!["13", "14"]);
}

#[tokio::test]
async fn auto_select_beyond_catalog_saturates() {
    let mock = Arc::new(MockCatalog::numbered(15));
    let mut ctl = controller_over(mock, MemoryStore::new());
    ctl.fetch_page(1).await.unwrap();
    ctl.auto_select(50).await.unwrap();
    ctl.fetch_page(2).await.unwrap();
    ctl.fetch_page(3).await.unwrap();

    assert_eq!(ctl.selection().len(), 15);
    assert_eq!(ctl.pending_auto_select(), 35);
    assert!(ctl.records().is_empty());
    assert_eq!(ctl.total_records(), 15);
}

#[tokio::test]
async fn restart_restores_selection_and_page() {
    let mock = Arc::new(MockCatalog::numbered(100));
    let kv = MemoryStore::new();

    let (selection, page) = {
        let mut ctl = controller_over(mock.clone(), kv.clone());
        ctl.fetch_page(1).await.unwrap();
        ctl.set_selection(&num(&[1, 12]));
        ctl.fetch_page(4).await.unwrap();
        ctl.set_selection(&num(&[40]));
        (ctl.selection().clone(), ctl.current_page())
    };

    let mut restarted = controller_over(mock, kv);
    assert_eq!(restarted.selection(), &selection);
    assert_eq!(restarted.current_page(), page);

    restarted.fetch_page(restarted.current_page()).await.unwrap();
    assert_eq!(visible_keys(&restarted), vec!["40"]);
}

#[tokio::test]
async fn restart_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockCatalog::numbered(40));

    {
        let store = StateStore::new(FileStore::open(dir.path()).unwrap());
        let mut ctl = SelectionController::new(mock.clone(), store, PAGE_SIZE);
        ctl.fetch_page(3).await.unwrap();
        ctl.set_selection(&num(&[30, 31]));
    }

    let store = StateStore::new(FileStore::open(dir.path()).unwrap());
    let ctl = SelectionController::new(mock, store, PAGE_SIZE);
    assert_eq!(ctl.current_page(), 3);
    assert_eq!(ctl.selection().len(), 2);
}

#[tokio::test]
async fn failed_fetch_mutates_nothing() {
    let mock = Arc::new(MockCatalog::numbered(40).fail_page(2));
    let kv = MemoryStore::new();
    let mut ctl = controller_over(mock.clone(), kv.clone());
    ctl.fetch_page(1).await.unwrap();
    ctl.set_selection(&num(&[1]));
    ctl.request_auto_select(4);

    assert!(ctl.fetch_page(2).await.is_err());
    assert_eq!(ctl.current_page(), 1);
    assert_eq!(ctl.records()[0].key(), "1");
    assert_eq!(ctl.selection().len(), 1);
    assert_eq!(ctl.pending_auto_select(), 4);
    assert!(!ctl.is_loading());
    assert_eq!(StateStore::new(kv).load_page().unwrap(), 1);

    // No retry happened behind our back.
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn late_response_loses_to_newer_request() {
    let mock = Arc::new(MockCatalog::numbered(60).with_delay(Duration::from_millis(200)));
    let mut ctl = controller_over(mock.clone(), MemoryStore::new());

    // Two page clicks in a row; the first answer arrives after the second.
    let slow = ctl.begin_fetch(2);
    let fast = ctl.begin_fetch(3);
    let catalog = ctl.catalog();
    let (late, early) = tokio::join!(
        catalog.fetch_page(slow.page, PAGE_SIZE),
        catalog.fetch_page(fast.page, PAGE_SIZE)
    );

    assert!(ctl.apply_page(fast, early.unwrap()));
    assert!(!ctl.apply_page(slow, late.unwrap()));
    assert_eq!(ctl.current_page(), 3);
    assert_eq!(ctl.records()[0].key(), "25");
    assert!(!ctl.is_loading());
}
