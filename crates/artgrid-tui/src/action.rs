/// Everything the UI can be asked to do, after input mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    Reload,
    /// Toggle the row under the cursor.
    ToggleRow,
    /// Header checkbox: select or clear every row on the page.
    ToggleAll,
    /// Show/hide the auto-select popup.
    ToggleAutoSelect,
    CountInput(char),
    CountBackspace,
    CountSubmit,
    CountCancel,
    ToggleHelp,
    ClickAt(u16, u16),
    Resize(u16, u16),
    Tick,
    None,
}
