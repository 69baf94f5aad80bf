use super::{App, InputMode};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if action == Action::Tick {
            self.tick = self.tick.wrapping_add(1);
            return false;
        }
        if action == Action::Quit {
            self.should_quit = true;
            return true;
        }

        // Help overlay swallows everything except closing it
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::CountCancel) {
                self.show_help = false;
            }
            return false;
        }

        // Auto-select popup has focus
        if self.input_mode == InputMode::Count {
            match action {
                Action::CountInput(c) => self.popup.push_digit(c),
                Action::CountBackspace => self.popup.backspace(),
                Action::CountSubmit => self.submit_auto_select(),
                Action::CountCancel | Action::ToggleAutoSelect => self.close_auto_select(),
                _ => {}
            }
            return false;
        }

        match action {
            Action::MoveDown => {
                let len = self.controller.records().len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::GoTop => {
                self.cursor = 0;
            }
            Action::GoBottom => {
                self.cursor = self.controller.records().len().saturating_sub(1);
            }
            Action::NextPage => self.next_page(),
            Action::PrevPage => self.prev_page(),
            Action::FirstPage => self.first_page(),
            Action::LastPage => self.last_page(),
            Action::Reload => self.request_page(self.target_page),
            Action::ToggleRow => self.toggle_row(self.cursor),
            Action::ToggleAll => self.toggle_all(),
            Action::ToggleAutoSelect => self.open_auto_select(),
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::ClickAt(column, row) => {
                if let Some(index) = self.row_at(column, row) {
                    self.cursor = index;
                    self.toggle_row(index);
                }
            }
            Action::CountInput(_)
            | Action::CountBackspace
            | Action::CountSubmit
            | Action::CountCancel
            | Action::Resize(_, _)
            | Action::Tick
            | Action::Quit
            | Action::None => {}
        }
        false
    }
}
