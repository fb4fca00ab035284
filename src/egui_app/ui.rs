#![cfg(feature = "egui")]

use eframe::egui::{self, Color32, Event, Pos2, Rect, Sense, TouchPhase};

use crate::engine::{Key, Modifiers};
use crate::geometry::Vec2f;
use crate::input::{PointerButton, PointerSample};
use crate::model::{
    CellShape, ConnectionType, DEFAULT_WEB_RADIUS, MAX_THICKNESS_RATIO, MIN_CONNECTION_DENSITY,
    MIN_THICKNESS_RATIO, MIN_WEB_RADIUS,
};
use crate::viewport::{MAX_ZOOM_PERCENT, MIN_ZOOM_PERCENT};

use super::state::GridPaintApp;
use super::surface::{EguiSurface, color32_to_rgba, rgba_to_color32};

fn to_vec2f(p: Pos2) -> Vec2f {
    Vec2f::new(p.x, p.y)
}

fn map_button(b: egui::PointerButton) -> PointerButton {
    match b {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Secondary,
    }
}

fn map_key(k: egui::Key) -> Key {
    match k {
        egui::Key::Z => Key::Z,
        egui::Key::Y => Key::Y,
        egui::Key::Space => Key::Space,
        _ => Key::Other,
    }
}

fn map_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.ctrl,
        command: m.mac_cmd,
        shift: m.shift,
    }
}

pub fn update(app: &mut GridPaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("gridpaint_controls")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| controls(app, ui));

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| canvas(app, ui));
}

// ────────────────────────────────────────────────────────────────────────────
// Control panel
// ────────────────────────────────────────────────────────────────────────────

fn controls(app: &mut GridPaintApp, ui: &mut egui::Ui) {
    ui.heading("Grid Paint");
    ui.separator();

    let mut shape = app.engine.style().shape;
    egui::ComboBox::from_label("Shape")
        .selected_text(shape.label())
        .show_ui(ui, |ui| {
            for s in CellShape::ALL {
                ui.selectable_value(&mut shape, s, s.label());
            }
        });
    if shape != app.engine.style().shape {
        app.engine.set_shape(shape);
    }

    let mut connection = app.engine.style().connection_type;
    egui::ComboBox::from_label("Connections")
        .selected_text(connection.label())
        .show_ui(ui, |ui| {
            for c in ConnectionType::ALL {
                ui.selectable_value(&mut connection, c, c.label());
            }
        });
    if connection != app.engine.style().connection_type {
        app.engine.set_connection_type(connection);
    }

    let mut thickness = app.engine.style().thickness_ratio;
    if ui
        .add(egui::Slider::new(&mut thickness, MIN_THICKNESS_RATIO..=MAX_THICKNESS_RATIO).text("Thickness"))
        .changed()
    {
        app.engine.set_thickness_ratio(thickness);
    }

    let mut density = app.engine.style().connection_density;
    let density_enabled = !matches!(connection, ConnectionType::Ref | ConnectionType::Off);
    if ui
        .add_enabled(
            density_enabled,
            egui::Slider::new(&mut density, MIN_CONNECTION_DENSITY..=1.0).text("Density"),
        )
        .changed()
    {
        app.engine.set_connection_density(density);
    }

    let mut radius = app.engine.style().web_radius;
    if ui
        .add_enabled(
            connection == ConnectionType::Web,
            egui::Slider::new(&mut radius, MIN_WEB_RADIUS..=DEFAULT_WEB_RADIUS).text("Web reach"),
        )
        .changed()
    {
        app.engine.set_web_radius(radius);
    }

    let mut zoom = app.engine.viewport().zoom_percent();
    if ui
        .add(egui::Slider::new(&mut zoom, MIN_ZOOM_PERCENT..=MAX_ZOOM_PERCENT).text("Zoom %"))
        .changed()
    {
        let applied = app.engine.zoom(zoom);
        app.zoom_text = format!("{}", applied.round());
    }
    ui.horizontal(|ui| {
        ui.label("Zoom");
        let resp = ui.text_edit_singleline(&mut app.zoom_text);
        if resp.lost_focus() {
            let applied = app.engine.zoom_from_input(&app.zoom_text);
            app.zoom_text = format!("{}", applied.round());
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Fill");
        let mut fill = rgba_to_color32(app.engine.style().fill_color);
        if ui.color_edit_button_srgba(&mut fill).changed() {
            app.engine.set_fill_color(color32_to_rgba(fill));
        }
        ui.label("Background");
        let mut bg = rgba_to_color32(app.engine.style().background_color);
        if ui.color_edit_button_srgba(&mut bg).changed() {
            app.engine.set_background_color(color32_to_rgba(bg));
        }
    });

    ui.separator();
    let status = *app.status.borrow();
    ui.horizontal(|ui| {
        if ui.add_enabled(status.can_undo, egui::Button::new("Undo")).clicked() {
            app.engine.undo();
        }
        if ui.add_enabled(status.can_redo, egui::Button::new("Redo")).clicked() {
            app.engine.redo();
        }
        if ui.button("Clear").clicked() {
            app.engine.clear();
        }
        if ui.button("Reset view").clicked() {
            app.engine.reset_view();
            app.zoom_text = "100".to_string();
        }
    });
    ui.label(format!("Cells: {}", app.status.borrow().cells));
    ui.separator();
    ui.small("Drag: paint / erase\nSpace+drag or middle drag: pan\nTwo fingers: pan\nCtrl+Z / Ctrl+Y: undo / redo");
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

fn canvas(app: &mut GridPaintApp, ui: &mut egui::Ui) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    app.engine.resize(to_vec2f(rect.min), to_vec2f(rect.max) - to_vec2f(rect.min), 1.0);

    handle_events(app, ui, rect);

    // Zoom with scroll, anchored at the cursor.
    let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
    if scroll_y.abs() > 0.0 && response.hovered() {
        let factor = (1.0 + scroll_y * 0.001).max(0.1);
        let anchor = response.hover_pos().unwrap_or(rect.center());
        let applied = app
            .engine
            .zoom_at(app.engine.viewport().zoom_percent() * factor, to_vec2f(anchor));
        app.zoom_text = format!("{}", applied.round());
    }

    let painter = ui.painter_at(rect);
    let mut surface = EguiSurface::new(&painter, rect);
    app.engine.render(Some(&mut surface));

    if app.engine.input().pan_modifier() {
        painter.text(
            rect.left_bottom() + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            "pan",
            egui::FontId::proportional(12.0),
            Color32::GRAY,
        );
    }
}

fn handle_events(app: &mut GridPaintApp, ui: &egui::Ui, rect: Rect) {
    let events = ui.ctx().input(|i| i.events.clone());
    let wants_keyboard = ui.ctx().wants_keyboard_input();
    let saw_touch = events.iter().any(|e| matches!(e, Event::Touch { .. }));

    for event in events {
        match event {
            Event::Touch { id, phase, pos, .. } => {
                let p = to_vec2f(pos);
                match phase {
                    TouchPhase::Start => {
                        if !rect.contains(pos) && app.touches.is_empty() {
                            continue;
                        }
                        app.touches.insert(id, p);
                        let sample = PointerSample::touches(&app.touch_points(), p);
                        app.engine.pointer_down(sample);
                    }
                    TouchPhase::Move => {
                        if let Some(slot) = app.touches.get_mut(&id) {
                            *slot = p;
                            let sample = PointerSample::touches(&app.touch_points(), p);
                            app.engine.pointer_move(sample);
                        }
                    }
                    TouchPhase::End | TouchPhase::Cancel => {
                        if app.touches.shift_remove(&id).is_some() {
                            let sample = PointerSample::touches(&app.touch_points(), p);
                            app.engine.pointer_up(sample);
                        }
                    }
                }
            }
            // egui mirrors the first finger as pointer events; touches are handled above.
            Event::PointerButton { .. } | Event::PointerMoved(_) if saw_touch || !app.touches.is_empty() => {}
            Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let b = map_button(button);
                if pressed {
                    if app.mouse_button.is_none() && rect.contains(pos) {
                        app.mouse_button = Some(b);
                        app.engine
                            .pointer_down(PointerSample::mouse(to_vec2f(pos), b, true));
                    }
                } else if app.mouse_button == Some(b) {
                    app.mouse_button = None;
                    app.engine
                        .pointer_up(PointerSample::mouse(to_vec2f(pos), b, false));
                }
            }
            Event::PointerMoved(pos) => {
                if let Some(b) = app.mouse_button {
                    app.engine
                        .pointer_move(PointerSample::mouse(to_vec2f(pos), b, true));
                }
            }
            Event::PointerGone => {
                if let Some(b) = app.mouse_button.take() {
                    let last = app.engine.viewport().origin();
                    app.engine.pointer_up(PointerSample::mouse(last, b, false));
                }
            }
            Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                ..
            } => {
                // Releases bypass the focus filter.
                if !pressed {
                    app.engine.key_up(map_key(key));
                    continue;
                }
                if wants_keyboard || repeat {
                    continue;
                }
                app.engine.key_down(map_key(key), map_modifiers(modifiers));
            }
            Event::WindowFocused(false) => {
                app.engine.release_modifiers();
            }
            _ => {}
        }
    }
}
