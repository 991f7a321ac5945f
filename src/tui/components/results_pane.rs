use crate::services::Results;
use crate::tui::{Component, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Text pane for stats documents and messages
pub struct ResultsPane {
    results: Results,
}

impl Default for ResultsPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsPane {
    pub fn new() -> Self {
        Self {
            results: Results::Empty,
        }
    }

    pub fn set_results(&mut self, results: &Results) {
        self.results = results.clone();
    }

    pub fn results(&self) -> &Results {
        &self.results
    }
}

impl Component for ResultsPane {
    fn handle_action(&mut self, _action: crate::tui::Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Results")
            .border_style(theme.border_style());

        let (text, style) = match &self.results {
            Results::Empty => ("", theme.normal_style()),
            Results::Message(text) => (text.as_str(), theme.message_style()),
            Results::Json(text) => (text.as_str(), theme.json_style()),
        };

        // JSON indentation is meaningful, don't trim
        let paragraph = Paragraph::new(text)
            .style(style)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn supported_actions(&self) -> &[crate::tui::Action] {
        &[]
    }

    fn name(&self) -> &str {
        "ResultsPane"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_shows_latest_results() {
        let mut pane = ResultsPane::new();
        assert_eq!(pane.results(), &Results::Empty);

        pane.set_results(&Results::Message("No column selected.".to_string()));
        assert_eq!(pane.results().text(), "No column selected.");

        let backend = TestBackend::new(30, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| pane.render(frame, frame.area()))
            .unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("No column selected."));
    }
}
