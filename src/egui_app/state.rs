#![cfg(feature = "egui")]

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::{self, TouchId};
use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::engine::{EngineObserver, GridPaint};
use crate::geometry::Vec2f;
use crate::input::PointerButton;

/// Status readouts pushed by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine {
    pub cells: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

struct StatusObserver(Rc<RefCell<StatusLine>>);

impl EngineObserver for StatusObserver {
    fn cells_changed(&mut self, count: usize) {
        self.0.borrow_mut().cells = count;
    }
    fn history_changed(&mut self, can_undo: bool, can_redo: bool) {
        let mut s = self.0.borrow_mut();
        s.can_undo = can_undo;
        s.can_redo = can_redo;
    }
}

/// Interactive egui host for the Grid Paint engine.
pub struct GridPaintApp {
    pub engine: GridPaint,
    pub status: Rc<RefCell<StatusLine>>,
    /// Text in the zoom input box.
    pub zoom_text: String,
    /// Mouse button held on the canvas, if any.
    pub(crate) mouse_button: Option<PointerButton>,
    /// Active touch points in screen space, in landing order.
    pub(crate) touches: IndexMap<TouchId, Vec2f>,
}

impl GridPaintApp {
    pub fn new(config: &EngineConfig) -> Self {
        let mut engine = GridPaint::new(config);
        let status = Rc::new(RefCell::new(StatusLine::default()));
        engine.set_observer(Box::new(StatusObserver(status.clone())));
        let zoom_text = format!("{}", engine.viewport().zoom_percent().round());
        Self {
            engine,
            status,
            zoom_text,
            mouse_button: None,
            touches: IndexMap::new(),
        }
    }

    pub(crate) fn touch_points(&self) -> Vec<Vec2f> {
        self.touches.values().copied().collect()
    }
}

impl eframe::App for GridPaintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::ui::update(self, ctx);
    }
}
