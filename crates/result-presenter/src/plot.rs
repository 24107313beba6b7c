//! Dual-Panel Spectrum Plot

use crate::PresenterError;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use run_tracking::RunContext;
use spectral_core::PipelineArrays;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the rendered figure
pub const PLOT_FILE: &str = "visualization.png";

/// Smallest figure that still leaves room for both panels
const MIN_DIMENSION: u32 = 200;

/// Colors used by the renderer
#[derive(Debug, Clone, Copy)]
pub struct PlotStyle {
    pub background: Rgb<u8>,
    pub axis: Rgb<u8>,
    pub baseline: Rgb<u8>,
    pub original: Rgb<u8>,
    pub reconstructed: Rgb<u8>,
    pub spectrum: Rgb<u8>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
            axis: Rgb([0, 0, 0]),
            baseline: Rgb([200, 200, 200]),
            original: Rgb([31, 119, 180]),
            reconstructed: Rgb([214, 39, 40]),
            spectrum: Rgb([44, 160, 44]),
        }
    }
}

/// Pixel rectangle of one panel
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

/// Linear data-to-pixel mapping for one panel
#[derive(Debug, Clone, Copy)]
struct Scale {
    panel: Panel,
    x: (f64, f64),
    y: (f64, f64),
}

impl Scale {
    fn new(panel: Panel, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            panel,
            x: widen(x),
            y: widen(y),
        }
    }

    fn point(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = ((x - self.x.0) / (self.x.1 - self.x.0)) as f32;
        let fy = ((y - self.y.0) / (self.y.1 - self.y.0)) as f32;
        (
            self.panel.left + fx * self.panel.width,
            self.panel.top + (1.0 - fy) * self.panel.height,
        )
    }

    fn contains_y(&self, y: f64) -> bool {
        self.y.0 <= y && y <= self.y.1
    }
}

/// Expand an empty range so the mapping never divides by zero
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi - lo > f64::EPSILON * lo.abs().max(1.0) {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn bounds<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Renders the time-domain overlay above the magnitude spectrum
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    width: u32,
    height: u32,
    margin: u32,
    style: PlotStyle,
}

impl Default for PlotRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            margin: 60,
            style: PlotStyle::default(),
        }
    }
}

impl PlotRenderer {
    /// Create a renderer for a `width` x `height` canvas
    pub fn new(width: u32, height: u32) -> Result<Self, PresenterError> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(PresenterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            margin: (width.min(height) / 20).max(10),
            style: PlotStyle::default(),
        })
    }

    /// Replace the default colors
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    /// Canvas size in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn panels(&self) -> (Panel, Panel) {
        let m = self.margin as f32;
        let w = self.width as f32 - 2.0 * m;
        let h = (self.height as f32 - 3.0 * m) / 2.0;
        let top = Panel {
            left: m,
            top: m,
            width: w,
            height: h,
        };
        let bottom = Panel {
            left: m,
            top: 2.0 * m + h,
            width: w,
            height: h,
        };
        (top, bottom)
    }

    /// Draw both panels into an in-memory image
    pub fn render_image(&self, arrays: &PipelineArrays) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, self.style.background);
        let (time_panel, spectrum_panel) = self.panels();

        self.draw_time_panel(&mut img, time_panel, arrays);
        self.draw_spectrum_panel(&mut img, spectrum_panel, arrays);
        img
    }

    /// Render to an explicit path
    pub fn render_to(&self, arrays: &PipelineArrays, path: &Path) -> Result<(), PresenterError> {
        self.render_image(arrays).save(path)?;
        info!(width = self.width, height = self.height, "Wrote {}", path.display());
        Ok(())
    }

    /// Render `visualization.png` into the run directory
    pub fn render(
        &self,
        ctx: &RunContext,
        arrays: &PipelineArrays,
    ) -> Result<PathBuf, PresenterError> {
        ctx.prepare()?;
        let path = ctx.artifact_path(PLOT_FILE);
        self.render_to(arrays, &path)?;
        Ok(path)
    }

    fn draw_time_panel(&self, img: &mut RgbImage, panel: Panel, arrays: &PipelineArrays) {
        let x = bounds(arrays.time().iter());
        let y = bounds(arrays.original().iter().chain(arrays.reconstructed()));
        let pad = (y.1 - y.0) * 0.05;
        let scale = Scale::new(panel, x, (y.0 - pad, y.1 + pad));

        self.draw_frame(img, &scale);
        self.draw_trace(img, &scale, arrays.time(), arrays.original(), self.style.original);
        self.draw_trace(
            img,
            &scale,
            arrays.time(),
            arrays.reconstructed(),
            self.style.reconstructed,
        );
    }

    fn draw_spectrum_panel(&self, img: &mut RgbImage, panel: Panel, arrays: &PipelineArrays) {
        let x = bounds(arrays.frequencies().iter());
        let (_, peak) = bounds(arrays.magnitudes().iter());
        let scale = Scale::new(panel, x, (0.0, peak * 1.05));

        self.draw_frame(img, &scale);
        for (f, m) in arrays.spectrum_rows() {
            let base = scale.point(f, 0.0);
            let tip = scale.point(f, m);
            draw_line_segment_mut(img, base, tip, self.style.spectrum);
            draw_filled_circle_mut(img, (tip.0 as i32, tip.1 as i32), 2, self.style.spectrum);
        }
    }

    fn draw_frame(&self, img: &mut RgbImage, scale: &Scale) {
        let p = scale.panel;
        if scale.contains_y(0.0) {
            let left = scale.point(scale.x.0, 0.0);
            let right = scale.point(scale.x.1, 0.0);
            draw_line_segment_mut(img, left, right, self.style.baseline);
        }
        let rect = Rect::at(p.left as i32, p.top as i32).of_size(p.width as u32, p.height as u32);
        draw_hollow_rect_mut(img, rect, self.style.axis);
    }

    fn draw_trace(
        &self,
        img: &mut RgbImage,
        scale: &Scale,
        xs: &[f64],
        ys: &[f64],
        color: Rgb<u8>,
    ) {
        let points: Vec<(f32, f32)> = xs.iter().zip(ys).map(|(&x, &y)| scale.point(x, y)).collect();
        if let [only] = points.as_slice() {
            draw_filled_circle_mut(img, (only.0 as i32, only.1 as i32), 2, color);
            return;
        }
        for pair in points.windows(2) {
            draw_line_segment_mut(img, pair[0], pair[1], color);
        }
    }
}
