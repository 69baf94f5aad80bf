use artgrid_core::{FetchError, FetchTicket, Page};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Fetch the page named by `ticket`.
    FetchPage { ticket: FetchTicket, limit: u32 },
}

/// Events flowing from the backend fetch tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// A fetch finished, successfully or not. Stale tickets are dropped by
    /// the controller.
    PageFetched {
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
    },
}
