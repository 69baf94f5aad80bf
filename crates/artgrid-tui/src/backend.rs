use std::sync::Arc;

use artgrid_core::{CatalogSource, FetchTicket};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Listen for commands until the channel closes or `cancel` fires.
///
/// Each fetch runs as its own task, so a slow page never blocks a newer
/// request; ordering is resolved by the controller's tickets.
pub async fn run(
    catalog: Arc<dyn CatalogSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        match cmd {
            BackendCommand::FetchPage { ticket, limit } => {
                let catalog = Arc::clone(&catalog);
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    fetch_page(catalog, ticket, limit, tx).await;
                });
            }
        }
    }
}

/// Fetch one page and report the outcome. A closed receiver means the UI is
/// gone, so the result is simply dropped.
pub async fn fetch_page(
    catalog: Arc<dyn CatalogSource>,
    ticket: FetchTicket,
    limit: u32,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    tracing::debug!(source = catalog.name(), page = ticket.page, seq = ticket.seq, "fetching");
    let result = catalog.fetch_page(ticket.page, limit).await;
    let _ = tx.send(BackendEvent::PageFetched { ticket, result });
}

#[cfg(test)]
mod tests {
    use super::*;
    use artgrid_core::catalog::mock::MockCatalog;

    #[tokio::test]
    async fn fetch_command_produces_event() {
        let catalog: Arc<dyn CatalogSource> = Arc::new(MockCatalog::numbered(20));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(catalog, cmd_rx, event_tx, cancel.clone()));

        let ticket = FetchTicket { seq: 7, page: 2 };
        cmd_tx
            .send(BackendCommand::FetchPage { ticket, limit: 12 })
            .unwrap();

        let BackendEvent::PageFetched { ticket: got, result } = event_rx.recv().await.unwrap();
        assert_eq!(got, ticket);
        assert_eq!(result.unwrap().records.len(), 8);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failure_is_forwarded() {
        let catalog: Arc<dyn CatalogSource> = Arc::new(MockCatalog::numbered(20).fail_page(1));
        let (tx, mut rx) = mpsc::unbounded_channel();
        fetch_page(catalog, FetchTicket { seq: 1, page: 1 }, 12, tx).await;
        let BackendEvent::PageFetched { result, .. } = rx.recv().await.unwrap();
        assert!(result.is_err());
    }
}
