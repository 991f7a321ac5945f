//! File chooser
//!
//! A single-line path input overlaid on the explorer. Confirming hands the
//! path to the app; confirming an empty input clears the choice.

use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear},
    Frame,
};
use std::path::{Path, PathBuf};

pub struct FilePrompt {
    input: String,
    /// Cursor position in characters
    cursor: usize,
    confirmed: bool,
}

impl Default for FilePrompt {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FilePrompt {
    /// Start from the currently chosen file, if any
    pub fn new(current: Option<&Path>) -> Self {
        let input = current
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        let cursor = input.chars().count();
        Self {
            input,
            cursor,
            confirmed: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// The chosen path; blank input means no file
    pub fn value(&self) -> Option<PathBuf> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor);
        self.input.insert(offset, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset(self.cursor);
            self.input.remove(offset);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let offset = self.byte_offset(self.cursor);
            self.input.remove(offset);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}

impl Component for FilePrompt {
    /// Returns whether the prompt stays open
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Confirm => {
                self.confirmed = true;
                Ok(false)
            }
            Action::Cancel => Ok(false),
            _ => Ok(true),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title("Choose CSV file (Enter to confirm, Esc to cancel)")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme.focused_border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width < 4 {
            return;
        }

        let buf = frame.buffer_mut();
        let y = inner.y;
        buf.set_string(inner.x, y, "> ", theme.focused_border_style());

        // Keep the cursor in view for long paths
        let visible = inner.width.saturating_sub(3) as usize;
        let skip = self.cursor.saturating_sub(visible);
        let mut x = inner.x + 2;
        for (i, c) in self.input.chars().enumerate().skip(skip).take(visible) {
            let style = if i == self.cursor {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                theme.normal_style()
            };
            buf.set_string(x, y, c.to_string(), style);
            x += 1;
        }
        if self.cursor == self.input.chars().count() {
            buf.set_string(
                x,
                y,
                " ",
                Style::default()
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            );
        }
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Confirm, Action::Cancel]
    }

    fn name(&self) -> &str {
        "FilePrompt"
    }
}
