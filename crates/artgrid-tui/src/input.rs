use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Count => map_key_count(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        MouseEventKind::Down(MouseButton::Left) => Action::ClickAt(mouse.column, mouse.row),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Action::NextPage,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Char('<') => Action::FirstPage,
        KeyCode::Char('>') => Action::LastPage,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleRow,
        KeyCode::Char('a') => Action::ToggleAll,
        KeyCode::Char('n') => Action::ToggleAutoSelect,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::CountCancel,
        _ => Action::None,
    }
}

fn map_key_count(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::CountCancel,
        KeyCode::Enter => Action::CountSubmit,
        KeyCode::Backspace => Action::CountBackspace,
        KeyCode::Char(c) if c.is_ascii_digit() => Action::CountInput(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let evt = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&evt, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&evt, &InputMode::Count), Action::Quit);
    }

    #[test]
    fn count_mode_only_accepts_digits() {
        assert_eq!(
            map_event(&press(KeyCode::Char('7')), &InputMode::Count),
            Action::CountInput('7')
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('x')), &InputMode::Count),
            Action::None
        );
        // 'q' types nothing instead of quitting while the popup has focus.
        assert_eq!(
            map_event(&press(KeyCode::Char('q')), &InputMode::Count),
            Action::None
        );
    }

    #[test]
    fn arrows_page_and_move() {
        assert_eq!(
            map_event(&press(KeyCode::Right), &InputMode::Normal),
            Action::NextPage
        );
        assert_eq!(
            map_event(&press(KeyCode::Down), &InputMode::Normal),
            Action::MoveDown
        );
    }
}
