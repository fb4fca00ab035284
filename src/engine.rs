//! The drawing engine facade driven by a host UI.
//!
//! [`GridPaint`] owns the cell grid, its history, the viewport, the gesture
//! controller and the current style. Every mutation happens synchronously in
//! the call that caused it and flags the scene for a re-render; the host calls
//! [`GridPaint::render`] with whatever surface it has.

use crate::color::{Rgba, parse_hex_color};
use crate::config::EngineConfig;
use crate::geometry::Vec2f;
use crate::grid::{CellGrid, PaintMode};
use crate::history::{History, Snapshot};
use crate::input::{InputAction, InputController, PointerSample};
use crate::model::{Cell, CellShape, ConnectionType, StrokeStyle};
use crate::render::{CellRenderer, RenderStats, Surface};
use crate::viewport::Viewport;

/// Host callbacks for status readouts and control enablement.
pub trait EngineObserver {
    fn cells_changed(&mut self, _count: usize) {}
    fn history_changed(&mut self, _can_undo: bool, _can_redo: bool) {}
}

/// Keys the engine reacts to; hosts map everything else to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Z,
    Y,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    fn shortcut(&self) -> bool {
        self.ctrl || self.command
    }
}

pub struct GridPaint {
    grid: CellGrid,
    history: History,
    viewport: Viewport,
    input: InputController,
    style: StrokeStyle,
    density_seed: u64,
    observer: Option<Box<dyn EngineObserver>>,
    needs_render: bool,
}

impl std::fmt::Debug for GridPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridPaint")
            .field("cells", &self.grid.len())
            .field("history", &self.history.len())
            .field("viewport", &self.viewport)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Default for GridPaint {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl GridPaint {
    pub fn new(config: &EngineConfig) -> Self {
        let mut viewport =
            Viewport::new(config.base_cell_size).with_min_grid_extent(config.min_grid_extent);
        viewport.zoom(config.zoom_percent);
        let grid = CellGrid::new(viewport.grid_size());
        Self {
            grid,
            history: History::new(config.history_limit, Snapshot::empty()),
            viewport,
            input: InputController::new(),
            style: config.style.clone().sanitized(),
            density_seed: config.density_seed,
            observer: None,
            needs_render: true,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observer = Some(observer);
        self.notify();
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    fn notify(&mut self) {
        let count = self.grid.len();
        let (can_undo, can_redo) = (self.history.can_undo(), self.history.can_redo());
        if let Some(obs) = self.observer.as_mut() {
            obs.cells_changed(count);
            obs.history_changed(can_undo, can_redo);
        }
    }

    fn grid_changed(&mut self) {
        self.needs_render = true;
        self.notify();
    }

    // ── Cell edits ──────────────────────────────────────────────────────────

    /// Toggle `cell` (or force a mode). Records history when the set changed.
    pub fn toggle_cell(&mut self, cell: Cell, mode: Option<PaintMode>) -> bool {
        match self.grid.toggle(cell, mode) {
            Some(applied) => {
                tracing::trace!(%cell, ?applied, "cell toggled");
                self.history.push(Snapshot::from(&self.grid));
                self.grid_changed();
                true
            }
            None => false,
        }
    }

    /// Empty the grid. Always recorded as one history entry.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.history.push(Snapshot::empty());
        tracing::debug!("grid cleared");
        self.grid_changed();
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.grid.replace_cells(snapshot.cells().clone());
        tracing::debug!(cursor = self.history.cursor(), "undo");
        self.grid_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.grid.replace_cells(snapshot.cells().clone());
        tracing::debug!(cursor = self.history.cursor(), "redo");
        self.grid_changed();
        true
    }

    // ── Viewport ────────────────────────────────────────────────────────────

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.viewport.pan(dx, dy);
        self.needs_render = true;
    }

    pub fn zoom(&mut self, percent: f32) -> f32 {
        self.needs_render = true;
        self.viewport.zoom(percent)
    }

    /// Zoom from free-form text; malformed input keeps the current zoom.
    pub fn zoom_from_input(&mut self, input: &str) -> f32 {
        self.needs_render = true;
        self.viewport.zoom_from_input(input)
    }

    /// Zoom keeping the point under `anchor` (screen space) in place.
    pub fn zoom_at(&mut self, percent: f32, anchor: Vec2f) -> f32 {
        self.needs_render = true;
        self.viewport.zoom_at(percent, anchor)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.needs_render = true;
    }

    /// Surface moved or resized. Re-derives the grid bounds; never edits cells.
    pub fn resize(&mut self, origin: Vec2f, screen_size: Vec2f, pixel_ratio: f32) {
        let before = (self.viewport.origin(), self.viewport.canvas_size(), self.viewport.pixel_ratio());
        self.viewport.resize(origin, screen_size, pixel_ratio);
        let after = (self.viewport.origin(), self.viewport.canvas_size(), self.viewport.pixel_ratio());
        if before != after {
            self.grid.set_grid_size(self.viewport.grid_size());
            self.needs_render = true;
        }
    }

    // ── Style ───────────────────────────────────────────────────────────────

    pub fn set_fill_color(&mut self, color: Rgba) {
        self.style.fill_color = color;
        self.needs_render = true;
    }

    /// Returns false (and keeps the old color) when `hex` does not parse.
    pub fn set_fill_color_hex(&mut self, hex: &str) -> bool {
        match parse_hex_color(hex) {
            Some(c) => {
                self.set_fill_color(c);
                true
            }
            None => {
                tracing::debug!(hex, "malformed fill color ignored");
                false
            }
        }
    }

    pub fn set_background_color(&mut self, color: Rgba) {
        self.style.background_color = color;
        self.needs_render = true;
    }

    pub fn set_background_color_hex(&mut self, hex: &str) -> bool {
        match parse_hex_color(hex) {
            Some(c) => {
                self.set_background_color(c);
                true
            }
            None => {
                tracing::debug!(hex, "malformed background color ignored");
                false
            }
        }
    }

    pub fn set_shape(&mut self, shape: CellShape) {
        self.style.shape = shape;
        self.needs_render = true;
    }

    pub fn set_connection_type(&mut self, connection_type: ConnectionType) {
        self.style.connection_type = connection_type;
        self.needs_render = true;
    }

    pub fn set_thickness_ratio(&mut self, ratio: f32) {
        self.style.set_thickness_ratio(ratio);
        self.needs_render = true;
    }

    pub fn set_connection_density(&mut self, density: f32) {
        self.style.set_connection_density(density);
        self.needs_render = true;
    }

    pub fn set_web_radius(&mut self, radius: f32) {
        self.style.set_web_radius(radius);
        self.needs_render = true;
    }

    pub fn set_weld_passes(&mut self, passes: u8) {
        self.style.weld_passes = passes.max(1);
        self.needs_render = true;
    }

    // ── Input ───────────────────────────────────────────────────────────────

    fn apply(&mut self, actions: Vec<InputAction>) {
        for action in actions {
            match action {
                InputAction::Paint { cell, mode } => {
                    self.toggle_cell(cell, Some(mode));
                }
                InputAction::SetPan(offset) => {
                    self.viewport.pan_offset = offset;
                    self.needs_render = true;
                }
            }
        }
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        let actions = self.input.press(sample, &self.viewport, &self.grid);
        self.apply(actions);
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        let actions = self.input.moved(sample, &self.viewport, &self.grid);
        self.apply(actions);
    }

    /// `sample.contacts` is the number of contacts still down.
    pub fn pointer_up(&mut self, sample: PointerSample) {
        let actions = self.input.release(sample, &self.viewport, &self.grid);
        self.apply(actions);
    }

    /// Handle a key press. Returns true when the key was consumed.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Z if modifiers.shortcut() && modifiers.shift => {
                self.redo();
                true
            }
            Key::Z if modifiers.shortcut() => {
                self.undo();
                true
            }
            Key::Y if modifiers.shortcut() => {
                self.redo();
                true
            }
            Key::Space => {
                self.input.set_pan_modifier(true);
                true
            }
            _ => false,
        }
    }

    /// Drop held modifiers, e.g. when the host window loses focus.
    pub fn release_modifiers(&mut self) {
        self.input.set_pan_modifier(false);
    }

    pub fn key_up(&mut self, key: Key) -> bool {
        if key == Key::Space {
            self.input.set_pan_modifier(false);
            return true;
        }
        false
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    /// Draw the scene. With no surface (not laid out yet, torn down) nothing happens
    /// and the pending render stays pending.
    pub fn render(&mut self, surface: Option<&mut dyn Surface>) -> RenderStats {
        if surface.is_none() {
            return RenderStats::default();
        }
        let stats = CellRenderer::new(&self.viewport, &self.style)
            .with_density_seed(self.density_seed)
            .render(surface, &self.grid);
        self.needs_render = false;
        stats
    }
}
