use serde::{Deserialize, Serialize};
use strum::Display;

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Table navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Column selector
    NextColumn,
    PrevColumn,
    FirstColumn,
    LastColumn,

    // Dataset operations
    ChooseFile,
    Upload,
    ViewTable,
    ViewStats,
    ViewHistogram,

    // Application
    Quit,
    Confirm,
    Cancel,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Scroll table up",
            Action::MoveDown => "Scroll table down",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::GoToTop => "Go to first row",
            Action::GoToBottom => "Go to last row",
            Action::NextColumn => "Select next column",
            Action::PrevColumn => "Select previous column",
            Action::FirstColumn => "Select first column",
            Action::LastColumn => "Select last column",
            Action::ChooseFile => "Choose file",
            Action::Upload => "Upload file",
            Action::ViewTable => "Reload table",
            Action::ViewStats => "Column stats",
            Action::ViewHistogram => "Column histogram",
            Action::Quit => "Quit application",
            Action::Confirm => "Confirm",
            Action::Cancel => "Cancel",
        }
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::MoveUp,
            Action::MoveDown,
            Action::PageUp,
            Action::PageDown,
            Action::GoToTop,
            Action::GoToBottom,
            Action::NextColumn,
            Action::PrevColumn,
            Action::FirstColumn,
            Action::LastColumn,
            Action::ChooseFile,
            Action::Upload,
            Action::ViewTable,
            Action::ViewStats,
            Action::ViewHistogram,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
        ]
    }
}
