mod update;


use artgrid_core::store::KeyValueStore;
use artgrid_core::{FetchTicket, RecordId, SelectionController};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::model::popup::AutoSelectPopup;
use crate::theme::Theme;
use crate::tui_event::{BackendCommand, BackendEvent};

/// Controller over whatever store `main` picked.
pub type Controller = SelectionController<Box<dyn KeyValueStore>>;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// The auto-select popup has focus and takes digits.
    Count,
}

pub struct App {
    pub controller: Controller,
    pub theme: Theme,
    pub input_mode: InputMode,
    /// Row cursor within the visible page.
    pub cursor: usize,
    pub popup: AutoSelectPopup,
    pub show_help: bool,
    pub should_quit: bool,
    pub tick: usize,
    /// Page of the most recent request. Navigation steps from here so that
    /// repeated presses during a slow fetch are not lost.
    pub target_page: u32,
    pub last_ticket: Option<FetchTicket>,
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Table area and scroll offset from the last draw, for mouse hit-testing.
    pub last_table_area: Option<Rect>,
    pub table_offset: usize,
}

impl App {
    pub fn new(controller: Controller, theme: Theme) -> Self {
        let target_page = controller.current_page();
        Self {
            controller,
            theme,
            input_mode: InputMode::Normal,
            cursor: 0,
            popup: AutoSelectPopup::default(),
            show_help: false,
            should_quit: false,
            tick: 0,
            target_page,
            last_ticket: None,
            backend_cmd_tx: None,
            last_table_area: None,
            table_offset: 0,
        }
    }

    /// Ask the backend for `page`. The answer arrives later as a
    /// [`BackendEvent`].
    pub fn request_page(&mut self, page: u32) {
        let ticket = self.controller.begin_fetch(page);
        self.target_page = ticket.page;
        self.dispatch(ticket);
    }

    fn dispatch(&mut self, ticket: FetchTicket) {
        self.last_ticket = Some(ticket);
        if let Some(tx) = &self.backend_cmd_tx {
            let cmd = BackendCommand::FetchPage {
                ticket,
                limit: self.controller.page_size(),
            };
            if tx.send(cmd).is_err() {
                tracing::warn!(page = ticket.page, "backend is gone, fetch not sent");
            }
        }
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::PageFetched { ticket, result } => {
                let previous_page = self.controller.current_page();
                let applied = match result {
                    Ok(page) => self.controller.apply_page(ticket, page),
                    Err(e) => self.controller.fail_fetch(ticket, &e),
                };
                if applied {
                    if self.controller.current_page() != previous_page {
                        self.cursor = 0;
                        self.table_offset = 0;
                    }
                    self.target_page = self.controller.current_page();
                    self.clamp_cursor();
                }
            }
        }
    }

    pub fn next_page(&mut self) {
        if self.target_page < self.controller.total_pages() {
            self.request_page(self.target_page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.target_page > 1 {
            self.request_page(self.target_page - 1);
        }
    }

    pub fn first_page(&mut self) {
        if self.target_page != 1 {
            self.request_page(1);
        }
    }

    pub fn last_page(&mut self) {
        let last = self.controller.total_pages();
        if last > 0 && self.target_page != last {
            self.request_page(last);
        }
    }

    /// Ids currently checked on the visible page.
    fn visible_ids(&self) -> Vec<RecordId> {
        self.controller
            .visible_selection()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }

    /// Flip the checkbox of visible row `index`.
    pub fn toggle_row(&mut self, index: usize) {
        let Some(record) = self.controller.records().get(index) else {
            return;
        };
        let key = record.key();
        let id = record.id.clone();

        let mut ids = self.visible_ids();
        if let Some(pos) = ids.iter().position(|i| i.key() == key) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }
        self.controller.set_selection(&ids);
    }

    /// Header checkbox: clear the page if every row is checked, else check all.
    pub fn toggle_all(&mut self) {
        let records = self.controller.records();
        if records.is_empty() {
            return;
        }
        let all_checked = self.all_visible_selected();
        let ids: Vec<RecordId> = if all_checked {
            Vec::new()
        } else {
            records.iter().map(|r| r.id.clone()).collect()
        };
        self.controller.set_selection(&ids);
    }

    pub fn all_visible_selected(&self) -> bool {
        let records = self.controller.records();
        !records.is_empty() && self.controller.visible_selection().len() == records.len()
    }

    pub fn open_auto_select(&mut self) {
        self.popup.visible = true;
        self.input_mode = InputMode::Count;
    }

    pub fn close_auto_select(&mut self) {
        self.popup.close();
        self.input_mode = InputMode::Normal;
    }

    /// Submit the popup: close it, reset its field, arm auto-select and
    /// refetch the current page.
    pub fn submit_auto_select(&mut self) {
        let count = self.popup.take();
        self.input_mode = InputMode::Normal;
        let ticket = self.controller.request_auto_select(count);
        self.target_page = ticket.page;
        self.dispatch(ticket);
    }

    /// Map a terminal click to a visible row index, if it hit one.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.last_table_area?;
        // Top border plus header row.
        let first_row_y = area.y + 2;
        let inside_x = column > area.x && column < area.x + area.width.saturating_sub(1);
        if !inside_x || row < first_row_y || row >= area.y + area.height.saturating_sub(1) {
            return None;
        }
        let index = (row - first_row_y) as usize + self.table_offset;
        (index < self.controller.records().len()).then_some(index)
    }

    fn clamp_cursor(&mut self) {
        let len = self.controller.records().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn view(&mut self, f: &mut ratatui::Frame) {
        crate::view::render(f, self);
    }
}
