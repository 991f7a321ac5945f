//! Histogram layout and drawing.
//!
//! Bars are laid out on a fixed-size surface in canvas coordinates: the origin
//! is the top-left corner and `y` grows downwards, so a bar anchored to the
//! bottom edge starts at `height - bar_height`.

/// Surface width in drawing units
pub const SURFACE_WIDTH: f64 = 400.0;
/// Surface height in drawing units; the tallest bar spans all of it
pub const SURFACE_HEIGHT: f64 = 200.0;
/// Width of each bar
pub const BAR_WIDTH: f64 = 8.0;
/// Horizontal distance between the left edges of neighbouring bars
pub const BAR_PITCH: f64 = 10.0;

/// Fixed geometry of the histogram surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramGeometry {
    pub width: f64,
    pub height: f64,
    pub bar_width: f64,
    pub bar_pitch: f64,
}

impl Default for HistogramGeometry {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            bar_width: BAR_WIDTH,
            bar_pitch: BAR_PITCH,
        }
    }
}

/// An axis-aligned filled rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilledRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One laid-out bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub count: u64,
    pub rect: FilledRect,
}

/// Scale counts into bars.
///
/// Returns nothing for an empty or all-zero histogram, since there is no
/// maximum to scale against. Buckets past the right edge are still laid out;
/// the surface clips them.
pub fn layout_bars(counts: &[u64], geometry: &HistogramGeometry) -> Vec<Bar> {
    let max_count = counts.iter().copied().max().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }

    counts
        .iter()
        .enumerate()
        .map(|(index, &count)| {
            let height = count as f64 / max_count as f64 * geometry.height;
            Bar {
                index,
                count,
                rect: FilledRect {
                    x: index as f64 * geometry.bar_pitch,
                    y: geometry.height - height,
                    width: geometry.bar_width,
                    height,
                },
            }
        })
        .collect()
}

/// Anything bars can be painted on
pub trait Surface {
    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Paint a rectangle in the surface's single fill color
    fn fill_rect(&mut self, rect: FilledRect);
}

/// Clear `surface` and paint one bar per bucket. Returns the number of bars.
pub fn draw_histogram<S: Surface + ?Sized>(
    surface: &mut S,
    counts: &[u64],
    geometry: &HistogramGeometry,
) -> usize {
    surface.clear();
    let bars = layout_bars(counts, geometry);
    for bar in &bars {
        surface.fill_rect(bar.rect);
    }
    bars.len()
}

/// In-memory surface that keeps what was painted on it.
///
/// The terminal chart reads it back on every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramCanvas {
    geometry: HistogramGeometry,
    rects: Vec<FilledRect>,
    clears: usize,
    caption: Option<String>,
}

impl HistogramCanvas {
    pub fn new(geometry: HistogramGeometry) -> Self {
        Self {
            geometry,
            rects: Vec::new(),
            clears: 0,
            caption: None,
        }
    }

    pub fn geometry(&self) -> &HistogramGeometry {
        &self.geometry
    }

    pub fn rects(&self) -> &[FilledRect] {
        &self.rects
    }

    /// How many times the surface has been cleared
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn is_blank(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }
}

impl Surface for HistogramCanvas {
    fn clear(&mut self) {
        self.rects.clear();
        self.caption = None;
        self.clears += 1;
    }

    fn fill_rect(&mut self, rect: FilledRect) {
        self.rects.push(rect);
    }
}
