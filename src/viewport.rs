//! Pan/zoom state and the screen <-> cell coordinate mapping.
//!
//! Three spaces are involved:
//! - screen: host pointer coordinates (CSS pixels / egui points),
//! - canvas: drawing-surface pixels, `(screen - origin) * pixel_ratio`,
//! - cell: integer grid coordinates, `floor((canvas - pan) / cell_size)`.
//!
//! The viewport never touches the cell set.

use serde::{Deserialize, Serialize};

use crate::geometry::{RectF, Vec2f};
use crate::model::Cell;

pub const MIN_ZOOM_PERCENT: f32 = 25.0;
pub const MAX_ZOOM_PERCENT: f32 = 400.0;
pub const DEFAULT_BASE_CELL_SIZE: f32 = 20.0;
pub const DEFAULT_MIN_GRID_EXTENT: i32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Pan offset in canvas pixels.
    pub pan_offset: Vec2f,
    zoom_percent: f32,
    base_cell_size: f32,
    /// Top-left of the drawing surface in screen coordinates.
    origin: Vec2f,
    /// Canvas pixels per screen unit.
    pixel_ratio: f32,
    /// Surface size in canvas pixels.
    canvas_size: Vec2f,
    min_grid_extent: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_CELL_SIZE)
    }
}

impl Viewport {
    pub fn new(base_cell_size: f32) -> Self {
        let base_cell_size = if base_cell_size.is_finite() && base_cell_size > 0.0 {
            base_cell_size
        } else {
            DEFAULT_BASE_CELL_SIZE
        };
        Self {
            pan_offset: Vec2f::ZERO,
            zoom_percent: 100.0,
            base_cell_size,
            origin: Vec2f::ZERO,
            pixel_ratio: 1.0,
            canvas_size: Vec2f::new(800.0, 600.0),
            min_grid_extent: DEFAULT_MIN_GRID_EXTENT,
        }
    }

    pub fn with_min_grid_extent(mut self, extent: i32) -> Self {
        self.min_grid_extent = extent.max(1);
        self
    }

    pub fn zoom_percent(&self) -> f32 {
        self.zoom_percent
    }

    pub fn base_cell_size(&self) -> f32 {
        self.base_cell_size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn origin(&self) -> Vec2f {
        self.origin
    }

    pub fn canvas_size(&self) -> Vec2f {
        self.canvas_size
    }

    /// Cell edge length in canvas pixels. Always positive.
    pub fn cell_size(&self) -> f32 {
        self.base_cell_size * self.zoom_percent / 100.0
    }

    /// Set the zoom, clamped to `[25, 400]`. Returns the applied percentage.
    pub fn zoom(&mut self, percent: f32) -> f32 {
        if percent.is_finite() {
            self.zoom_percent = percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT);
        } else {
            tracing::debug!(percent, "non-finite zoom ignored");
        }
        self.zoom_percent
    }

    /// Parse a zoom from text input; unparsable input keeps the last valid zoom.
    pub fn zoom_from_input(&mut self, input: &str) -> f32 {
        let trimmed = input.trim().trim_end_matches('%').trim();
        match trimmed.parse::<f32>() {
            Ok(p) => self.zoom(p),
            Err(_) => {
                tracing::debug!(input, kept = self.zoom_percent, "malformed zoom input");
                self.zoom_percent
            }
        }
    }

    /// Zoom while keeping the point under `anchor` (screen space) fixed.
    pub fn zoom_at(&mut self, percent: f32, anchor: Vec2f) -> f32 {
        let canvas = self.screen_to_canvas(anchor);
        let old = self.cell_size();
        let world = (canvas - self.pan_offset) * (1.0 / old);
        self.zoom(percent);
        let new = self.cell_size();
        self.pan_offset = canvas - world * new;
        self.zoom_percent
    }

    /// Add a canvas-pixel delta to the pan offset. Unbounded.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_offset += Vec2f::new(dx, dy);
        }
    }

    /// Update the surface placement and size (screen units) after a resize.
    pub fn resize(&mut self, origin: Vec2f, screen_size: Vec2f, pixel_ratio: f32) {
        self.origin = origin;
        self.pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        self.canvas_size = Vec2f::new(
            screen_size.x.max(0.0) * self.pixel_ratio,
            screen_size.y.max(0.0) * self.pixel_ratio,
        );
        tracing::debug!(
            width = self.canvas_size.x,
            height = self.canvas_size.y,
            ratio = self.pixel_ratio,
            "viewport resized"
        );
    }

    /// Half-extent of the paintable area in cells.
    ///
    /// Derived from the surface size at minimum zoom so zooming never changes it.
    pub fn grid_size(&self) -> i32 {
        let min_cell = self.base_cell_size * MIN_ZOOM_PERCENT / 100.0;
        let extent = self.canvas_size.x.max(self.canvas_size.y) / min_cell;
        (extent.ceil() as i32).max(self.min_grid_extent)
    }

    pub fn screen_to_canvas(&self, p: Vec2f) -> Vec2f {
        (p - self.origin) * self.pixel_ratio
    }

    pub fn canvas_to_screen(&self, p: Vec2f) -> Vec2f {
        p * (1.0 / self.pixel_ratio) + self.origin
    }

    /// Convert a screen-space displacement into canvas pixels.
    pub fn screen_delta_to_canvas(&self, d: Vec2f) -> Vec2f {
        d * self.pixel_ratio
    }

    pub fn screen_to_cell(&self, p: Vec2f) -> Cell {
        self.canvas_to_cell(self.screen_to_canvas(p))
    }

    pub fn canvas_to_cell(&self, p: Vec2f) -> Cell {
        let cs = self.cell_size();
        let x = ((p.x - self.pan_offset.x) / cs).floor();
        let y = ((p.y - self.pan_offset.y) / cs).floor();
        Cell::new(x as i32, y as i32)
    }

    /// Center of `cell` in canvas pixels (render space).
    pub fn cell_center(&self, cell: Cell) -> Vec2f {
        let cs = self.cell_size();
        Vec2f::new(
            cell.x as f32 * cs + self.pan_offset.x + cs * 0.5,
            cell.y as f32 * cs + self.pan_offset.y + cs * 0.5,
        )
    }

    /// Center of `cell` in screen coordinates; maps back to `cell` via [`Self::screen_to_cell`].
    pub fn cell_to_screen_center(&self, cell: Cell) -> Vec2f {
        self.canvas_to_screen(self.cell_center(cell))
    }

    /// Canvas-pixel rectangle covered by `cell`.
    pub fn cell_rect(&self, cell: Cell) -> RectF {
        let cs = self.cell_size();
        RectF::from_center_size(self.cell_center(cell), cs, cs)
    }

    /// Inclusive range of cells intersecting the surface: `(top_left, bottom_right)`.
    pub fn visible_cells(&self) -> (Cell, Cell) {
        let tl = self.canvas_to_cell(Vec2f::ZERO);
        let br = self.canvas_to_cell(self.canvas_size);
        (tl, br)
    }

    pub fn canvas_rect(&self) -> RectF {
        RectF::from_min_max(Vec2f::ZERO, self.canvas_size)
    }

    pub fn reset(&mut self) {
        self.pan_offset = Vec2f::ZERO;
        self.zoom_percent = 100.0;
    }
}
