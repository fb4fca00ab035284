//! Egui-based interactive host for the drawing engine (feature = "egui").
//!
//! The host only translates egui input into engine calls and provides an
//! egui-painter [`crate::render::Surface`]; all drawing logic stays in the engine.

#![cfg(feature = "egui")]

mod state;
mod surface;
mod ui;

pub use state::{GridPaintApp, StatusLine};
pub use surface::EguiSurface;
