use crate::core::ColumnSelector;
use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Column selector view
///
/// Mirrors the explorer's [`ColumnSelector`]; navigation actions are applied
/// to the selector itself so the selection used for stats and histograms is
/// always the one on screen.
pub struct ColumnList {
    labels: Vec<String>,
    state: ListState,
    supported_actions: Vec<Action>,
}

impl Default for ColumnList {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnList {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            state: ListState::default(),
            supported_actions: vec![
                Action::NextColumn,
                Action::PrevColumn,
                Action::FirstColumn,
                Action::LastColumn,
            ],
        }
    }

    /// Copy labels and selection from the selector
    pub fn sync(&mut self, selector: &ColumnSelector) {
        self.labels = selector
            .options()
            .iter()
            .map(|option| option.label.clone())
            .collect();
        self.state.select(selector.selected_index());
    }

    /// Apply a column action to `selector`, then resync
    pub fn navigate(&mut self, selector: &mut ColumnSelector, action: Action) -> bool {
        match action {
            Action::NextColumn => selector.select_next(),
            Action::PrevColumn => selector.select_prev(),
            Action::FirstColumn => selector.select_first(),
            Action::LastColumn => selector.select_last(),
            _ => return false,
        }
        self.sync(selector);
        true
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }
}

impl Component for ColumnList {
    /// Column actions need the selector; see [`ColumnList::navigate`]
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Columns")
            .border_style(theme.border_style());

        let items: Vec<ListItem> = if self.labels.is_empty() {
            vec![ListItem::new("(none)").style(theme.muted_style())]
        } else {
            self.labels
                .iter()
                .map(|label| ListItem::new(label.as_str()))
                .collect()
        };

        let list = List::new(items)
            .block(block)
            .style(theme.normal_style())
            .highlight_style(theme.selected_style())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "ColumnList"
    }
}
