/// Longest count the popup accepts; keeps the parse within `usize` everywhere.
const MAX_DIGITS: usize = 9;

/// State of the "auto-select N rows" popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoSelectPopup {
    pub visible: bool,
    pub input: String,
}

impl AutoSelectPopup {
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() || self.input.len() >= MAX_DIGITS {
            return;
        }
        // No leading zeros: typing "0" then "5" yields "5".
        if self.input == "0" {
            self.input.clear();
        }
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Entered count; an empty field counts as zero.
    pub fn count(&self) -> usize {
        self.input.parse().unwrap_or(0)
    }

    /// Close and return the entered count, clearing the field for next time.
    pub fn take(&mut self) -> usize {
        let count = self.count();
        self.input.clear();
        self.visible = false;
        count
    }

    /// Text shown in the input field.
    pub fn display(&self) -> &str {
        if self.input.is_empty() { "0" } else { &self.input }
    }
}
