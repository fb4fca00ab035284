use gridpaint::geometry::Vec2f;
use gridpaint::input::{GestureState, PointerButton, PointerSample};
use gridpaint::trace::PathTracer;
use gridpaint::{Cell, ConnectionType, GridPaint, Key, Modifiers, PaintMode};

const CELL: f32 = 20.0;

fn engine() -> GridPaint {
    let mut gp = GridPaint::default();
    gp.resize(Vec2f::ZERO, Vec2f::new(400.0, 400.0), 1.0);
    gp
}

fn center(x: i32, y: i32) -> Vec2f {
    Vec2f::new(x as f32 * CELL + CELL / 2.0, y as f32 * CELL + CELL / 2.0)
}

fn mouse(p: Vec2f, pressed: bool) -> PointerSample {
    PointerSample::mouse(p, PointerButton::Primary, pressed)
}

#[test]
fn stroke_over_mixed_cells_only_draws() {
    let mut gp = engine();
    gp.toggle_cell(Cell::new(2, 0), None);

    gp.pointer_down(mouse(center(0, 0), true));
    assert_eq!(gp.input().mode(), Some(PaintMode::Draw));
    gp.pointer_move(mouse(center(4, 0), true));
    gp.pointer_up(mouse(center(4, 0), false));

    for x in 0..=4 {
        assert!(gp.grid().has(Cell::new(x, 0)), "cell {x} should be filled");
    }
    assert!(gp.input().is_idle());
    assert_eq!(gp.input().mode(), None);
}

#[test]
fn stroke_starting_on_filled_cell_erases() {
    let mut gp = engine();
    for x in 0..5 {
        gp.toggle_cell(Cell::new(x, 1), None);
    }
    gp.pointer_down(mouse(center(1, 1), true));
    assert_eq!(gp.input().mode(), Some(PaintMode::Erase));
    // Crossing an empty row does not draw it.
    gp.pointer_move(mouse(center(1, 2), true));
    gp.pointer_move(mouse(center(3, 1), true));
    gp.pointer_up(mouse(center(3, 1), false));
    assert!(!gp.grid().has(Cell::new(1, 1)));
    assert!(!gp.grid().has(Cell::new(1, 2)));
    assert!(gp.grid().has(Cell::new(0, 1)));
    assert!(gp.grid().has(Cell::new(4, 1)));
}

#[test]
fn new_gesture_rederives_mode() {
    let mut gp = engine();
    gp.pointer_down(mouse(center(0, 0), true));
    gp.pointer_up(mouse(center(0, 0), false));
    gp.pointer_down(mouse(center(0, 0), true));
    assert_eq!(gp.input().mode(), Some(PaintMode::Erase));
    gp.pointer_up(mouse(center(0, 0), false));
    assert_eq!(gp.cell_count(), 0);
}

#[test]
fn space_drag_pans_without_painting() {
    let mut gp = engine();
    assert!(gp.key_down(Key::Space, Modifiers::default()));
    assert!(gp.input().is_idle());
    gp.pointer_down(mouse(Vec2f::new(100.0, 100.0), true));
    gp.pointer_move(mouse(Vec2f::new(140.0, 90.0), true));
    gp.pointer_up(mouse(Vec2f::new(140.0, 90.0), false));
    gp.key_up(Key::Space);
    assert_eq!(gp.cell_count(), 0);
    assert_eq!(gp.viewport().pan_offset, Vec2f::new(40.0, -10.0));

    // Without the modifier the same drag paints.
    gp.pointer_down(mouse(Vec2f::new(100.0, 100.0), true));
    gp.pointer_up(mouse(Vec2f::new(100.0, 100.0), false));
    assert_eq!(gp.cell_count(), 1);
}

#[test]
fn middle_button_pans() {
    let mut gp = engine();
    gp.pointer_down(PointerSample::mouse(Vec2f::new(10.0, 10.0), PointerButton::Middle, true));
    gp.pointer_move(PointerSample::mouse(Vec2f::new(0.0, 30.0), PointerButton::Middle, true));
    gp.pointer_up(PointerSample::mouse(Vec2f::new(0.0, 30.0), PointerButton::Middle, false));
    assert_eq!(gp.viewport().pan_offset, Vec2f::new(-10.0, 20.0));
    assert_eq!(gp.cell_count(), 0);
}

#[test]
fn two_finger_pan_then_one_finger_draws() {
    let mut gp = engine();
    let a = Vec2f::new(100.0, 100.0);
    let b = Vec2f::new(200.0, 100.0);

    // First finger starts a stroke.
    gp.pointer_down(PointerSample::touches(&[a], a));
    assert_eq!(gp.cell_count(), 1);
    // Second finger: switch to panning.
    gp.pointer_down(PointerSample::touches(&[a, b], b));
    assert!(matches!(gp.input().state(), GestureState::Panning(_)));

    // Both fingers move by (+20, +40): centroid moves the same.
    let a2 = a + Vec2f::new(20.0, 40.0);
    let b2 = b + Vec2f::new(20.0, 40.0);
    gp.pointer_move(PointerSample::touches(&[a2, b2], b2));
    assert_eq!(gp.viewport().pan_offset, Vec2f::new(20.0, 40.0));

    // Lift the second finger: the first continues as a fresh stroke. The canvas
    // moved with the fingers, so it sits over the cell it drew and now erases.
    gp.pointer_up(PointerSample::touches(&[a2], b2));
    assert!(matches!(gp.input().state(), GestureState::Drawing(_)));
    assert_eq!(gp.input().mode(), Some(PaintMode::Erase));
    assert_eq!(gp.viewport().pan_offset, Vec2f::new(20.0, 40.0));
    assert_eq!(gp.cell_count(), 0);

    gp.pointer_up(PointerSample::touches(&[], a2));
    assert!(gp.input().is_idle());
}

#[test]
fn drawing_outside_bounds_is_silent() {
    let mut gp = engine();
    let far = gp.viewport().cell_to_screen_center(Cell::new(5000, 0));
    gp.pointer_down(mouse(far, true));
    gp.pointer_up(mouse(far, false));
    assert_eq!(gp.cell_count(), 0);
    assert!(!gp.can_undo());
}

#[test]
fn fast_diagonal_drag_paints_one_continuous_tube() {
    let mut gp = engine();
    gp.set_connection_type(ConnectionType::Ref);
    gp.pointer_down(mouse(center(0, 0), true));
    gp.pointer_move(mouse(center(4, 2), true));
    gp.pointer_up(mouse(center(4, 2), false));

    for c in [(1, 0), (3, 1)] {
        assert!(gp.grid().has(Cell::from(c)), "crossed cell {c:?} left empty");
    }
    let paths = PathTracer::trace(gp.grid());
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].cells().len(), gp.cell_count());
    assert_eq!(paths[0].first(), Cell::new(0, 0));
    assert_eq!(paths[0].last(), Cell::new(4, 2));
}

#[test]
fn three_fingers_pan_like_two() {
    let mut gp = engine();
    let pts = [
        Vec2f::new(100.0, 100.0),
        Vec2f::new(200.0, 100.0),
        Vec2f::new(150.0, 200.0),
    ];
    gp.pointer_down(PointerSample::touches(&pts[..1], pts[0]));
    gp.pointer_down(PointerSample::touches(&pts[..2], pts[1]));
    gp.pointer_down(PointerSample::touches(&pts, pts[2]));
    assert!(matches!(gp.input().state(), GestureState::Panning(_)));

    let moved: Vec<Vec2f> = pts.iter().map(|p| *p + Vec2f::new(-30.0, 10.0)).collect();
    gp.pointer_move(PointerSample::touches(&moved, moved[2]));
    let pan = gp.viewport().pan_offset;
    assert!((pan.x + 30.0).abs() < 1e-3 && (pan.y - 10.0).abs() < 1e-3, "{pan:?}");
    // Only the first finger's cell was painted before the pan started.
    assert_eq!(gp.cell_count(), 1);
}
