pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod keybindings;
pub mod theme;

pub use action::Action;
pub use app::App;
pub use component::Component;
pub use components::{ColumnList, DataTable, FilePrompt, HistogramChart, ResultsPane};
pub use keybindings::{KeyBinding, KeyBindings, KeyPattern};
pub use theme::Theme;
