//! Gesture state machine shared by mouse and touch input.
//!
//! Hosts translate their raw events into [`PointerSample`]s (centroid position +
//! number of active contacts) and feed them to [`InputController`]. The
//! controller never mutates the drawing itself: it returns [`InputAction`]s that
//! the engine applies, which keeps it testable against a plain grid/viewport.
//!
//! Transitions:
//! - `Idle -> Drawing` on a single primary contact without the pan modifier.
//! - `Idle -> Panning` on a middle press, a primary press with the pan modifier
//!   held, or two or more touch contacts.
//! - `Drawing -> Panning` when a second finger lands mid-stroke.
//! - `Panning -> Drawing` when a touch pan drops back to a single finger; the
//!   remaining finger starts a fresh stroke at its current cell.
//! - any state `-> Idle` once every contact is released.

use crate::geometry::Vec2f;
use crate::grid::{CellGrid, PaintMode, cells_between};
use crate::model::Cell;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    /// Finger contact; behaves like `Primary` for drawing.
    Touch,
}

/// Device-independent snapshot of the pointer(s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Screen position, or the centroid of all active touch points.
    pub position: Vec2f,
    /// Number of contacts still down after the event.
    pub contacts: usize,
    pub button: PointerButton,
}

impl PointerSample {
    pub fn mouse(position: Vec2f, button: PointerButton, pressed: bool) -> Self {
        Self {
            position,
            contacts: usize::from(pressed),
            button,
        }
    }

    /// Sample for the given active touch points. With no touches left the
    /// position falls back to `last` (usually the lifted finger).
    pub fn touches(points: &[Vec2f], last: Vec2f) -> Self {
        Self {
            position: Vec2f::centroid(points).unwrap_or(last),
            contacts: points.len(),
            button: PointerButton::Touch,
        }
    }
}

/// Per-stroke state; the mode is fixed by the first touched cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub mode: PaintMode,
    pub last_cell: Cell,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    pub start_position: Vec2f,
    pub start_offset: Vec2f,
    pub contacts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing(DragSession),
    Panning(PanSession),
}

/// Edits the engine applies on behalf of the controller, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Paint { cell: Cell, mode: PaintMode },
    SetPan(Vec2f),
}

#[derive(Debug, Clone, Default)]
pub struct InputController {
    state: GestureState,
    pan_modifier: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Paint mode of the stroke in progress, if any.
    pub fn mode(&self) -> Option<PaintMode> {
        match self.state {
            GestureState::Drawing(s) => Some(s.mode),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    /// Latch the pan modifier (space). Does not start a pan by itself.
    pub fn set_pan_modifier(&mut self, held: bool) {
        self.pan_modifier = held;
    }

    pub fn pan_modifier(&self) -> bool {
        self.pan_modifier
    }

    /// Drop any gesture in progress without emitting actions.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    fn wants_pan(&self, sample: &PointerSample) -> bool {
        match sample.button {
            PointerButton::Middle => true,
            PointerButton::Primary => self.pan_modifier,
            PointerButton::Touch => sample.contacts >= 2,
            PointerButton::Secondary => false,
        }
    }

    fn begin_pan(&mut self, sample: &PointerSample, viewport: &Viewport) {
        tracing::debug!(contacts = sample.contacts, "gesture: pan");
        self.state = GestureState::Panning(PanSession {
            start_position: sample.position,
            start_offset: viewport.pan_offset,
            contacts: sample.contacts,
        });
    }

    fn begin_draw(
        &mut self,
        sample: &PointerSample,
        viewport: &Viewport,
        grid: &CellGrid,
    ) -> Vec<InputAction> {
        let cell = viewport.screen_to_cell(sample.position);
        let mode = grid.inferred_mode(cell);
        tracing::debug!(%cell, ?mode, "gesture: draw");
        self.state = GestureState::Drawing(DragSession {
            mode,
            last_cell: cell,
        });
        vec![InputAction::Paint { cell, mode }]
    }

    /// A contact went down (mouse button press or an additional finger).
    pub fn press(
        &mut self,
        sample: PointerSample,
        viewport: &Viewport,
        grid: &CellGrid,
    ) -> Vec<InputAction> {
        match self.state {
            GestureState::Idle => {
                if self.wants_pan(&sample) {
                    self.begin_pan(&sample, viewport);
                    Vec::new()
                } else if matches!(sample.button, PointerButton::Primary | PointerButton::Touch)
                    && sample.contacts >= 1
                {
                    self.begin_draw(&sample, viewport, grid)
                } else {
                    Vec::new()
                }
            }
            GestureState::Drawing(_) => {
                if sample.contacts >= 2 {
                    self.begin_pan(&sample, viewport);
                }
                Vec::new()
            }
            GestureState::Panning(_) => {
                // Finger count changed: re-anchor so the centroid jump does not move the canvas.
                self.begin_pan(&sample, viewport);
                Vec::new()
            }
        }
    }

    /// The pointer (or touch centroid) moved.
    pub fn moved(
        &mut self,
        sample: PointerSample,
        viewport: &Viewport,
        _grid: &CellGrid,
    ) -> Vec<InputAction> {
        match self.state {
            GestureState::Idle => Vec::new(),
            GestureState::Drawing(session) => {
                if sample.button == PointerButton::Touch && sample.contacts >= 2 {
                    self.begin_pan(&sample, viewport);
                    return Vec::new();
                }
                let cell = viewport.screen_to_cell(sample.position);
                if cell == session.last_cell {
                    return Vec::new();
                }
                let actions = cells_between(session.last_cell, cell)
                    .into_iter()
                    .skip(1)
                    .map(|c| InputAction::Paint {
                        cell: c,
                        mode: session.mode,
                    })
                    .collect();
                self.state = GestureState::Drawing(DragSession {
                    last_cell: cell,
                    ..session
                });
                actions
            }
            GestureState::Panning(session) => {
                if sample.contacts != session.contacts && sample.contacts > 0 {
                    self.begin_pan(&sample, viewport);
                    return Vec::new();
                }
                let delta = viewport.screen_delta_to_canvas(sample.position - session.start_position);
                vec![InputAction::SetPan(session.start_offset + delta)]
            }
        }
    }

    /// A contact was lifted; `sample.contacts` is how many remain down.
    pub fn release(
        &mut self,
        sample: PointerSample,
        viewport: &Viewport,
        grid: &CellGrid,
    ) -> Vec<InputAction> {
        if sample.contacts == 0 {
            if !self.is_idle() {
                tracing::debug!("gesture: idle");
            }
            self.state = GestureState::Idle;
            return Vec::new();
        }
        match self.state {
            GestureState::Panning(_) if sample.contacts == 1 && sample.button == PointerButton::Touch => {
                self.begin_draw(&sample, viewport, grid)
            }
            GestureState::Panning(_) => {
                self.begin_pan(&sample, viewport);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InputController, Viewport, CellGrid) {
        let mut vp = Viewport::new(10.0);
        vp.resize(Vec2f::ZERO, Vec2f::new(200.0, 200.0), 1.0);
        (InputController::new(), vp, CellGrid::new(64))
    }

    fn at(cell: (i32, i32)) -> Vec2f {
        Vec2f::new(cell.0 as f32 * 10.0 + 5.0, cell.1 as f32 * 10.0 + 5.0)
    }

    #[test]
    fn first_cell_fixes_draw_mode() {
        let (mut ctl, vp, grid) = setup();
        let actions = ctl.press(
            PointerSample::mouse(at((1, 1)), PointerButton::Primary, true),
            &vp,
            &grid,
        );
        assert_eq!(
            actions,
            vec![InputAction::Paint {
                cell: Cell::new(1, 1),
                mode: PaintMode::Draw
            }]
        );
        assert_eq!(ctl.mode(), Some(PaintMode::Draw));
    }

    #[test]
    fn drag_fills_crossed_cells() {
        let (mut ctl, vp, grid) = setup();
        ctl.press(PointerSample::mouse(at((0, 0)), PointerButton::Primary, true), &vp, &grid);
        let actions = ctl.moved(
            PointerSample::mouse(at((3, 0)), PointerButton::Primary, true),
            &vp,
            &grid,
        );
        let cells: Vec<Cell> = actions
            .iter()
            .map(|a| match a {
                InputAction::Paint { cell, .. } => *cell,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(cells, vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]);
    }

    #[test]
    fn modifier_makes_primary_pan() {
        let (mut ctl, vp, grid) = setup();
        ctl.set_pan_modifier(true);
        let actions = ctl.press(
            PointerSample::mouse(Vec2f::new(50.0, 50.0), PointerButton::Primary, true),
            &vp,
            &grid,
        );
        assert!(actions.is_empty());
        assert!(matches!(ctl.state(), GestureState::Panning(_)));
        let actions = ctl.moved(
            PointerSample::mouse(Vec2f::new(60.0, 45.0), PointerButton::Primary, true),
            &vp,
            &grid,
        );
        assert_eq!(actions, vec![InputAction::SetPan(Vec2f::new(10.0, -5.0))]);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let (mut ctl, vp, grid) = setup();
        let actions = ctl.press(
            PointerSample::mouse(at((0, 0)), PointerButton::Secondary, true),
            &vp,
            &grid,
        );
        assert!(actions.is_empty());
        assert!(ctl.is_idle());
    }
}
