use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// A unit grid square identified by integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four orthogonal neighbors in scan order: +x, -x, +y, -y.
    pub fn orthogonal_neighbors(self) -> [Cell; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Glyph drawn for every filled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CellShape {
    #[default]
    Rounded,
    Square,
    Circle,
    Diamond,
}

impl CellShape {
    pub const ALL: [CellShape; 4] = [
        CellShape::Rounded,
        CellShape::Square,
        CellShape::Circle,
        CellShape::Diamond,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CellShape::Rounded => "Rounded",
            CellShape::Square => "Square",
            CellShape::Circle => "Circle",
            CellShape::Diamond => "Diamond",
        }
    }
}

/// How filled cells are linked to each other when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ConnectionType {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "90deg")]
    #[value(name = "90deg")]
    Orthogonal,
    #[serde(rename = "organic")]
    Organic,
    #[serde(rename = "web")]
    Web,
    #[serde(rename = "simple")]
    Simple,
    #[default]
    #[serde(rename = "ref")]
    Ref,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 6] = [
        ConnectionType::Off,
        ConnectionType::Orthogonal,
        ConnectionType::Organic,
        ConnectionType::Web,
        ConnectionType::Simple,
        ConnectionType::Ref,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConnectionType::Off => "Off",
            ConnectionType::Orthogonal => "90°",
            ConnectionType::Organic => "Organic",
            ConnectionType::Web => "Web",
            ConnectionType::Simple => "Simple",
            ConnectionType::Ref => "Ref (tubes)",
        }
    }
}

pub const MIN_THICKNESS_RATIO: f32 = 0.05;
pub const MAX_THICKNESS_RATIO: f32 = 1.2;
pub const MIN_CONNECTION_DENSITY: f32 = 0.01;
/// Web links reach at most this many cells; covers every web offset including knight moves.
pub const DEFAULT_WEB_RADIUS: f32 = 2.25;
/// Below this a web degenerates to nothing.
pub const MIN_WEB_RADIUS: f32 = 1.0;

/// Visual style applied on the next render. Changing it never touches the cell set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub fill_color: Rgba,
    pub background_color: Rgba,
    pub shape: CellShape,
    pub connection_type: ConnectionType,
    /// Stroke width as a fraction of the cell size.
    pub thickness_ratio: f32,
    /// Keep-probability of each neighbor edge (ignored in `ref` mode).
    pub connection_density: f32,
    /// Number of times traced tubes are stroked; the second pass welds joins visually.
    pub weld_passes: u8,
    /// Longest web link in cells; shorter radii drop knight and two-step links.
    pub web_radius: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            fill_color: Rgba::rgb(0x1e, 0x1e, 0x1e),
            background_color: Rgba::rgb(0xfa, 0xfa, 0xfa),
            shape: CellShape::Rounded,
            connection_type: ConnectionType::Ref,
            thickness_ratio: 0.6,
            connection_density: 1.0,
            weld_passes: 1,
            web_radius: DEFAULT_WEB_RADIUS,
        }
    }
}

impl StrokeStyle {
    pub fn set_thickness_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() {
            self.thickness_ratio = ratio.clamp(MIN_THICKNESS_RATIO, MAX_THICKNESS_RATIO);
        }
    }

    /// Densities are kept in `(0, 1]`; zero or negative input keeps a sliver of edges.
    pub fn set_connection_density(&mut self, density: f32) {
        if density.is_finite() {
            self.connection_density = density.clamp(MIN_CONNECTION_DENSITY, 1.0);
        }
    }

    pub fn set_web_radius(&mut self, radius: f32) {
        if radius.is_finite() {
            self.web_radius = radius.clamp(MIN_WEB_RADIUS, DEFAULT_WEB_RADIUS);
        }
    }

    /// Bring every numeric field into range. Non-finite values fall back to the defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = StrokeStyle::default();
        let (thickness, density, radius) =
            (self.thickness_ratio, self.connection_density, self.web_radius);
        self.thickness_ratio = defaults.thickness_ratio;
        self.connection_density = defaults.connection_density;
        self.web_radius = defaults.web_radius;
        self.set_thickness_ratio(thickness);
        self.set_connection_density(density);
        self.set_web_radius(radius);
        self.weld_passes = self.weld_passes.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_scan_order() {
        let n = Cell::new(3, 4).orthogonal_neighbors();
        assert_eq!(
            n,
            [Cell::new(4, 4), Cell::new(2, 4), Cell::new(3, 5), Cell::new(3, 3)]
        );
    }

    #[test]
    fn connection_type_serde_names() {
        let json = serde_json::to_string(&ConnectionType::Orthogonal).unwrap();
        assert_eq!(json, "\"90deg\"");
        let parsed: ConnectionType = serde_json::from_str("\"ref\"").unwrap();
        assert_eq!(parsed, ConnectionType::Ref);
    }

    #[test]
    fn style_setters_clamp_and_ignore_nan() {
        let mut style = StrokeStyle::default();
        style.set_thickness_ratio(5.0);
        assert_eq!(style.thickness_ratio, MAX_THICKNESS_RATIO);
        style.set_thickness_ratio(f32::NAN);
        assert_eq!(style.thickness_ratio, MAX_THICKNESS_RATIO);
        style.set_connection_density(0.0);
        assert!(style.connection_density > 0.0);
    }

    #[test]
    fn sanitized_pulls_fields_into_range() {
        let style = StrokeStyle {
            thickness_ratio: -3.0,
            connection_density: 0.0,
            weld_passes: 0,
            web_radius: f32::INFINITY,
            ..StrokeStyle::default()
        }
        .sanitized();
        assert_eq!(style.thickness_ratio, MIN_THICKNESS_RATIO);
        assert_eq!(style.connection_density, MIN_CONNECTION_DENSITY);
        assert_eq!(style.weld_passes, 1);
        assert_eq!(style.web_radius, DEFAULT_WEB_RADIUS);
        assert_eq!(StrokeStyle::default().sanitized(), StrokeStyle::default());
    }
}
