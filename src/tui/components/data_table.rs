use crate::core::TableGrid;
use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

/// Viewport into the rendered grid
#[derive(Debug, Clone)]
pub struct Viewport {
    pub top: usize,    // First visible row
    pub height: usize, // Visible rows
}

/// Scrollable view over the latest [`TableGrid`]
///
/// The grid is replaced wholesale on every table completion; the cursor is
/// clamped to the new row count.
pub struct DataTable {
    grid: TableGrid,
    cursor: usize,
    viewport: Viewport,
    highlighted_column: Option<String>,
    focused: bool,
    supported_actions: Vec<Action>,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self {
            grid: TableGrid::default(),
            cursor: 0,
            viewport: Viewport {
                top: 0,
                height: 20, // Updated from the render area
            },
            highlighted_column: None,
            focused: true,
            supported_actions: vec![
                Action::MoveUp,
                Action::MoveDown,
                Action::PageUp,
                Action::PageDown,
                Action::GoToTop,
                Action::GoToBottom,
            ],
        }
    }

    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Show `grid`; a different grid resets the scroll position
    pub fn set_grid(&mut self, grid: &TableGrid) {
        if &self.grid != grid {
            self.grid = grid.clone();
            self.cursor = 0;
            self.viewport.top = 0;
        }
    }

    /// Column whose header is emphasized (the selector's choice)
    pub fn set_highlighted_column(&mut self, column: Option<&str>) {
        self.highlighted_column = column.map(str::to_string);
    }

    /// Dimmed while an overlay owns the keyboard
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn row_count(&self) -> usize {
        self.grid.rows().len()
    }

    fn update_viewport(&mut self, area: Rect) {
        // Borders and header
        self.viewport.height = (area.height.saturating_sub(3) as usize).max(1);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor < self.viewport.top {
            self.viewport.top = self.cursor;
        } else if self.cursor >= self.viewport.top + self.viewport.height {
            self.viewport.top = self.cursor + 1 - self.viewport.height;
        }
    }

    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_cursor_visible();
        }
    }

    fn move_down(&mut self) {
        let row_count = self.row_count();
        if row_count > 0 && self.cursor < row_count - 1 {
            self.cursor += 1;
            self.ensure_cursor_visible();
        }
    }

    fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.viewport.height);
        self.ensure_cursor_visible();
    }

    fn page_down(&mut self) {
        let row_count = self.row_count();
        if row_count > 0 {
            self.cursor = (self.cursor + self.viewport.height).min(row_count - 1);
            self.ensure_cursor_visible();
        }
    }

    fn go_to_top(&mut self) {
        self.cursor = 0;
        self.ensure_cursor_visible();
    }

    fn go_to_bottom(&mut self) {
        self.cursor = self.row_count().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    fn title(&self) -> String {
        match &self.grid {
            TableGrid::Placeholder(_) => "Table".to_string(),
            TableGrid::Grid { rows, .. } => {
                format!("Table [{}/{}]", self.cursor + 1, rows.len())
            }
        }
    }
}

impl Component for DataTable {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::PageUp => self.page_up(),
            Action::PageDown => self.page_down(),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.update_viewport(area);

        let theme = Theme::default();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(if self.focused {
                theme.focused_border_style()
            } else {
                theme.border_style()
            });

        let table = match &self.grid {
            // One cell, no header
            TableGrid::Placeholder(message) => Table::new(
                vec![Row::new(vec![Cell::from(message.as_str())]).style(theme.muted_style())],
                [Constraint::Percentage(100)],
            ),
            TableGrid::Grid { header, rows } => {
                let header_cells: Vec<Cell> = header
                    .iter()
                    .map(|name| {
                        let cell = Cell::from(name.as_str());
                        if self.highlighted_column.as_deref() == Some(name.as_str()) {
                            cell.style(theme.selected_style())
                        } else {
                            cell
                        }
                    })
                    .collect();

                let visible: Vec<Row> = rows
                    .iter()
                    .enumerate()
                    .skip(self.viewport.top)
                    .take(self.viewport.height)
                    .map(|(index, cells)| {
                        let style = if index == self.cursor {
                            theme.selected_style()
                        } else if index % 2 == 1 {
                            theme.alt_row_style()
                        } else {
                            theme.normal_style()
                        };
                        Row::new(cells.iter().map(|c| Cell::from(c.as_str()))).style(style)
                    })
                    .collect();

                // Equal distribution
                let num_cols = header.len().max(1);
                let constraints = vec![Constraint::Ratio(1, num_cols as u32); num_cols];

                Table::new(visible, constraints)
                    .header(Row::new(header_cells).style(theme.header_style()))
            }
        };

        frame.render_widget(table.block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "DataTable"
    }
}
