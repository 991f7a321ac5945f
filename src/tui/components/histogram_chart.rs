use crate::core::histogram::FilledRect;
use crate::core::HistogramCanvas;
use crate::tui::{Component, Theme};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line},
        Block, Borders,
    },
    Frame,
};

/// Horizontal spacing of the strokes that fill a bar, in surface units
const FILL_STEP: f64 = 0.5;

/// Draws the histogram surface onto a ratatui canvas
///
/// The canvas bounds match the surface geometry, so rectangles are copied
/// across unscaled apart from flipping `y` (the surface grows downwards,
/// the canvas grows upwards).
pub struct HistogramChart {
    canvas: HistogramCanvas,
}

impl Default for HistogramChart {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramChart {
    pub fn new() -> Self {
        Self {
            canvas: HistogramCanvas::default(),
        }
    }

    pub fn set_canvas(&mut self, canvas: &HistogramCanvas) {
        self.canvas = canvas.clone();
    }

    pub fn canvas(&self) -> &HistogramCanvas {
        &self.canvas
    }

    fn title(&self) -> String {
        match self.canvas.caption() {
            Some(caption) => format!("Histogram: {caption}"),
            None => "Histogram".to_string(),
        }
    }
}

/// Vertical strokes covering `rect`, in canvas coordinates
pub fn fill_strokes(rect: &FilledRect, surface_height: f64) -> Vec<(f64, f64, f64)> {
    let bottom = surface_height - (rect.y + rect.height);
    let top = surface_height - rect.y;
    let mut strokes = Vec::new();
    let mut x = rect.x;
    while x <= rect.x + rect.width {
        strokes.push((x, bottom, top));
        x += FILL_STEP;
    }
    strokes
}

impl Component for HistogramChart {
    fn handle_action(&mut self, _action: crate::tui::Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        let geometry = *self.canvas.geometry();
        let rects = self.canvas.rects().to_vec();

        let chart = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title())
                    .border_style(theme.border_style()),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, geometry.width])
            .y_bounds([0.0, geometry.height])
            .paint(move |ctx| {
                for rect in &rects {
                    for (x, bottom, top) in fill_strokes(rect, geometry.height) {
                        ctx.draw(&Line {
                            x1: x,
                            y1: bottom,
                            x2: x,
                            y2: top,
                            color: theme.bar,
                        });
                    }
                }
            });

        frame.render_widget(chart, area);
    }

    fn supported_actions(&self) -> &[crate::tui::Action] {
        &[]
    }

    fn name(&self) -> &str {
        "HistogramChart"
    }
}
