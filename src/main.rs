//! Run the Grid Paint editor in a native window (requires `--features egui`).
//!
//! Usage:
//!   cargo run --features egui -- [--config style.json] [--shape circle] [--connection ref] [--zoom 150]

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use eframe::egui;
use gridpaint::egui_app::GridPaintApp;
use gridpaint::{CellShape, ConnectionType, EngineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Grid-based vector drawing with traced tube strokes", long_about = None)]
struct Args {
    /// JSON engine configuration (cell size, history depth, initial style)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<Utf8PathBuf>,

    /// Cell glyph shape
    #[arg(long, value_enum)]
    shape: Option<CellShape>,

    /// Connection style between filled cells
    #[arg(long, value_enum)]
    connection: Option<ConnectionType>,

    /// Initial zoom in percent (25-400)
    #[arg(long)]
    zoom: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridpaint=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(shape) = args.shape {
        config.style.shape = shape;
    }
    if let Some(connection) = args.connection {
        config.style.connection_type = connection;
    }
    if let Some(zoom) = args.zoom {
        config.zoom_percent = zoom;
    }
    tracing::info!(
        shape = ?config.style.shape,
        connection = ?config.style.connection_type,
        cell = config.base_cell_size,
        "starting grid paint"
    );

    let app = GridPaintApp::new(&config);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Grid Paint",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
