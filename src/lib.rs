//! Grid Paint: a grid-based vector drawing engine.
//!
//! Cells on an unbounded integer grid are painted on or off by pointer and
//! touch gestures. Filled cells are rendered as glyphs and linked by one of
//! several connection styles; the `ref` style traces them into continuous,
//! welded tube strokes.
//!
//! The engine is host-agnostic: a host feeds it [`input::PointerSample`]s and
//! key presses and hands it a [`render::Surface`] to draw on. An egui host is
//! provided behind the `egui` feature.

pub mod color;
pub mod config;
pub mod connections;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod history;
pub mod input;
pub mod model;
pub mod render;
pub mod trace;
pub mod viewport;

// Optional GUI host lives behind the `egui` feature flag and is used by the
// `gridpaint` binary.
#[cfg(feature = "egui")]
pub mod egui_app;

pub use config::EngineConfig;
pub use engine::{EngineObserver, GridPaint, Key, Modifiers};
pub use grid::{CellGrid, PaintMode};
pub use model::{Cell, CellShape, ConnectionType, StrokeStyle};
