use crate::core::HeaderMode;
use crate::services::{execute, Completion, DatasetService, Explorer, Request};
use crate::tui::components::{ColumnList, DataTable, FilePrompt, HistogramChart, ResultsPane};
use crate::tui::{Action, Component, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Actions listed in the footer
const HINT_ACTIONS: &[Action] = &[
    Action::ChooseFile,
    Action::Upload,
    Action::ViewTable,
    Action::ViewStats,
    Action::ViewHistogram,
    Action::NextColumn,
    Action::Quit,
];

/// Application state
///
/// Routes keys to actions, turns actions into explorer requests, and runs
/// each request on its own task. Finished requests come back through the
/// completion channel returned by [`App::new`] and must be fed to
/// [`App::on_completion`] by the event loop.
pub struct App<S> {
    service: Arc<S>,
    explorer: Explorer,

    /// File picked in the chooser (or on the command line)
    selected_file: Option<PathBuf>,

    /// File chooser (when active)
    file_prompt: Option<FilePrompt>,

    data_table: DataTable,
    column_list: ColumnList,
    results_pane: ResultsPane,
    histogram_chart: HistogramChart,

    keybindings: KeyBindings,
    theme: Theme,

    completions: UnboundedSender<Completion>,
    in_flight: usize,

    should_quit: bool,
}

impl<S> App<S>
where
    S: DatasetService + Send + Sync + 'static,
{
    /// Create the app and the receiving end of its completion channel
    pub fn new(
        service: S,
        header_mode: HeaderMode,
        keybindings: KeyBindings,
    ) -> (Self, UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let app = Self {
            service: Arc::new(service),
            explorer: Explorer::new(header_mode),
            selected_file: None,
            file_prompt: None,
            data_table: DataTable::new(),
            column_list: ColumnList::new(),
            results_pane: ResultsPane::new(),
            histogram_chart: HistogramChart::new(),
            keybindings,
            theme: Theme::default(),
            completions,
            in_flight: 0,
            should_quit: false,
        };
        (app, receiver)
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Only handle key press events, ignore release/repeat
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // The chooser takes text input before any binding applies
        if let Some(prompt) = &mut self.file_prompt {
            let plain = !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT);
            match key.code {
                KeyCode::Char(c) if plain => {
                    prompt.insert_char(c);
                    return Ok(());
                }
                KeyCode::Backspace => {
                    prompt.backspace();
                    return Ok(());
                }
                KeyCode::Delete => {
                    prompt.delete();
                    return Ok(());
                }
                KeyCode::Left => {
                    prompt.move_left();
                    return Ok(());
                }
                KeyCode::Right => {
                    prompt.move_right();
                    return Ok(());
                }
                KeyCode::Home => {
                    prompt.move_home();
                    return Ok(());
                }
                KeyCode::End => {
                    prompt.move_end();
                    return Ok(());
                }
                _ => {}
            }
        }

        if let Some(action) = self.keybindings.get_action(&key) {
            self.handle_action(action)?;
        }

        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        // Route to the chooser while it is open
        if let Some(prompt) = &mut self.file_prompt {
            if action == Action::Quit {
                self.should_quit = true;
                return Ok(());
            }
            let keep_open = prompt.handle_action(action)?;
            if !keep_open {
                if prompt.is_confirmed() {
                    self.selected_file = prompt.value();
                }
                self.file_prompt = None;
                self.sync_views();
            }
            return Ok(());
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ChooseFile => {
                self.file_prompt = Some(FilePrompt::new(self.selected_file.as_deref()));
            }
            Action::Upload => self.upload_selected(),
            Action::ViewTable => {
                let request = self.explorer.request_table();
                self.submit(request);
            }
            Action::ViewStats => {
                let request = self.explorer.request_stats();
                self.submit(request);
            }
            Action::ViewHistogram => {
                let request = self.explorer.request_histogram();
                self.submit(request);
            }
            Action::NextColumn | Action::PrevColumn | Action::FirstColumn | Action::LastColumn => {
                self.column_list
                    .navigate(self.explorer.selector_mut(), action);
            }
            _ => {
                self.data_table.handle_action(action)?;
            }
        }

        self.sync_views();
        Ok(())
    }

    /// Set the file used by the next upload
    pub fn select_file(&mut self, file: Option<PathBuf>) {
        self.selected_file = file;
    }

    /// Upload the selected file
    pub fn upload_selected(&mut self) {
        let request = self.explorer.request_upload(self.selected_file.as_deref());
        self.submit(request);
        self.sync_views();
    }

    /// Fold a finished request into the session and start any follow-up
    pub fn on_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let follow_up = self.explorer.apply(completion);
        self.submit(follow_up);
        self.sync_views();
    }

    fn submit(&mut self, request: Option<Request>) {
        let Some(request) = request else {
            return;
        };
        debug!("dispatching {:?}", request);
        self.in_flight += 1;

        let service = Arc::clone(&self.service);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let completion = execute(&*service, request).await;
            if completions.send(completion).is_err() {
                debug!("completion dropped, app has shut down");
            }
        });
    }

    fn sync_views(&mut self) {
        self.data_table.set_focused(self.file_prompt.is_none());
        self.data_table.set_grid(self.explorer.table());
        self.data_table
            .set_highlighted_column(self.explorer.selector().selected_value());
        self.column_list.sync(self.explorer.selector());
        self.results_pane.set_results(self.explorer.results());
        self.histogram_chart.set_canvas(self.explorer.canvas());
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests dispatched but not yet completed
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn file_prompt(&self) -> Option<&FilePrompt> {
        self.file_prompt.as_ref()
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Render the app
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status
                Constraint::Min(0),    // Panes
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        frame.render_widget(self.status_line(), rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(45),
                Constraint::Percentage(35),
            ])
            .split(rows[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[2]);

        self.column_list.render(frame, columns[0]);
        self.data_table.render(frame, columns[1]);
        self.results_pane.render(frame, right[0]);
        self.histogram_chart.render(frame, right[1]);

        frame.render_widget(
            Paragraph::new(self.keybindings.hints(HINT_ACTIONS)).style(self.theme.muted_style()),
            rows[2],
        );

        if let Some(prompt) = &mut self.file_prompt {
            prompt.render(frame, Self::centered_rect(60, 3, area));
        }
    }

    fn status_line(&self) -> Paragraph<'static> {
        let file = match &self.selected_file {
            Some(path) => path.display().to_string(),
            None => "no file chosen".to_string(),
        };
        let dataset = match self.explorer.session().dataset_id() {
            Some(id) => format!("dataset {id}"),
            None => "no dataset".to_string(),
        };

        let mut spans = vec![
            Span::styled(" dsview ", self.theme.header_style()),
            Span::raw(format!(" {file} | {dataset}")),
        ];
        if self.in_flight > 0 {
            spans.push(Span::styled(
                format!(" | {} request(s) running", self.in_flight),
                self.theme.message_style(),
            ));
        }
        Paragraph::new(Line::from(spans))
    }

    /// Centered rectangle `percent_w` wide and `height` rows tall
    fn centered_rect(percent_w: u16, height: u16, area: Rect) -> Rect {
        let width = (area.width * percent_w) / 100;
        let height = height.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}
