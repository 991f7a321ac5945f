use crate::tui::action::Action;
use color_eyre::Result;
use ratatui::{layout::Rect, Frame};

/// Base trait for all TUI components
///
/// Views own only presentation state (scroll offsets, cursors); the data they
/// show is pushed in by the app after every completion.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action was not handled and should propagate.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Render the component within the given area
    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Get list of actions this component supports
    fn supported_actions(&self) -> &[Action];

    /// Get component name for debugging/logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockComponent {
        actions: Vec<Action>,
    }

    impl Component for MockComponent {
        fn handle_action(&mut self, action: Action) -> Result<bool> {
            Ok(self.supported_actions().contains(&action))
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect) {}

        fn supported_actions(&self) -> &[Action] {
            &self.actions
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[test]
    fn test_component_action_handling() {
        let mut comp = MockComponent {
            actions: vec![Action::MoveUp, Action::MoveDown],
        };

        assert!(comp.handle_action(Action::MoveUp).unwrap());
        assert!(!comp.handle_action(Action::Quit).unwrap());
        assert_eq!(comp.name(), "mock");
    }
}
