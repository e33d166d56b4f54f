use crate::core::{
    config::{Color, Palette},
    geo::Point,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Building kinds that can be placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Spawn,
    Tower,
    Extension,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 3] = [MarkerKind::Spawn, MarkerKind::Tower, MarkerKind::Extension];

    /// Human-readable label used in tooltips
    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::Spawn => "Spawn",
            MarkerKind::Tower => "Tower",
            MarkerKind::Extension => "Extension",
        }
    }

    pub fn color(&self, palette: &Palette) -> Color {
        match self {
            MarkerKind::Spawn => palette.spawn,
            MarkerKind::Tower => palette.tower,
            MarkerKind::Extension => palette.extension,
        }
    }

    /// Rendered shape, in world pixels around the tile center
    pub fn shape(&self) -> MarkerShape {
        match self {
            MarkerKind::Spawn => MarkerShape::Circle { radius: 5.0 },
            MarkerKind::Tower => MarkerShape::RoundedSquare {
                size: 10.0,
                corner: 2.0,
            },
            MarkerKind::Extension => MarkerShape::Square { size: 8.0 },
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Spawn => write!(f, "spawn"),
            MarkerKind::Tower => write!(f, "tower"),
            MarkerKind::Extension => write!(f, "extension"),
        }
    }
}

/// Geometry of a marker glyph, centered on its tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    Circle { radius: f64 },
    Square { size: f64 },
    RoundedSquare { size: f64, corner: f64 },
}

impl MarkerShape {
    /// Half the side of the axis-aligned box enclosing the shape
    pub fn half_extent(&self) -> f64 {
        match *self {
            MarkerShape::Circle { radius } => radius,
            MarkerShape::Square { size } | MarkerShape::RoundedSquare { size, .. } => size / 2.0,
        }
    }

    /// Whether `offset` (relative to the shape center) lies inside the shape
    pub fn contains(&self, offset: &Point) -> bool {
        let dx = offset.x.abs();
        let dy = offset.y.abs();
        match *self {
            MarkerShape::Circle { radius } => dx * dx + dy * dy <= radius * radius,
            MarkerShape::Square { size } => {
                let half = size / 2.0;
                dx <= half && dy <= half
            }
            MarkerShape::RoundedSquare { size, corner } => {
                let half = size / 2.0;
                if dx > half || dy > half {
                    return false;
                }
                let inner = half - corner;
                if dx <= inner || dy <= inner {
                    return true;
                }
                let cx = dx - inner;
                let cy = dy - inner;
                cx * cx + cy * cy <= corner * corner
            }
        }
    }
}

/// A placed building. Owned by the host; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub room_name: String,
    /// Local tile column, `0..room_size`
    pub x: u32,
    /// Local tile row, `0..room_size`
    pub y: u32,
    #[serde(default, alias = "hp", skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,
}

impl Marker {
    pub fn new(id: impl Into<String>, kind: MarkerKind, room_name: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            room_name: room_name.into(),
            x,
            y,
            durability: None,
        }
    }

    pub fn with_durability(mut self, durability: u32) -> Self {
        self.durability = Some(durability);
        self
    }

    /// Tooltip body: label, room, local coordinates and durability if known
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.kind.label().to_string(),
            format!("Room: {}", self.room_name),
            format!("Position: ({}, {})", self.x, self.y),
        ];
        if let Some(durability) = self.durability {
            lines.push(format!("Durability: {durability}"));
        }
        lines
    }
}

/// Clamps a raw local coordinate into `0..=max_local`.
///
/// NaN becomes 0 and fractional values are floored onto their tile.
pub fn clamp_local(value: f64, max_local: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(0.0, f64::from(max_local)) as u32
}

/// Reads a coordinate typed by the operator; anything non-numeric reads as 0
pub fn parse_local(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Marker placement request as entered by the operator, before clamping
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub kind: MarkerKind,
    pub room_name: String,
    pub x: f64,
    pub y: f64,
}

impl MarkerDraft {
    pub fn new(kind: MarkerKind, room_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind,
            room_name: room_name.into(),
            x,
            y,
        }
    }

    /// Draft from raw form text; non-numeric coordinates become 0
    pub fn from_inputs(kind: MarkerKind, room_name: &str, x: &str, y: &str) -> Self {
        Self::new(kind, room_name.trim(), parse_local(x), parse_local(y))
    }

    /// Builds the marker with id `<kind>-<sequence>`, clamping both axes
    /// independently. Returns `None` when no target room is set.
    pub fn place(&self, sequence: u64, max_local: u32) -> Option<Marker> {
        if self.room_name.is_empty() {
            return None;
        }
        Some(Marker::new(
            format!("{}-{}", self.kind, sequence),
            self.kind,
            self.room_name.clone(),
            clamp_local(self.x, max_local),
            clamp_local(self.y, max_local),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_clamps_each_axis() {
        let draft = MarkerDraft::new(MarkerKind::Spawn, "W0N0", -5.0, 60.0);
        let marker = draft.place(1, 49).unwrap();
        assert_eq!(marker.x, 0);
        assert_eq!(marker.y, 49);
        assert_eq!(marker.id, "spawn-1");

        let marker = MarkerDraft::new(MarkerKind::Tower, "W0N0", 60.0, 12.7)
            .place(2, 49)
            .unwrap();
        assert_eq!((marker.x, marker.y), (49, 12));
    }

    #[test]
    fn test_non_numeric_inputs_read_as_zero() {
        let draft = MarkerDraft::from_inputs(MarkerKind::Extension, " E1S1 ", "abc", "");
        let marker = draft.place(3, 49).unwrap();
        assert_eq!(marker.room_name, "E1S1");
        assert_eq!((marker.x, marker.y), (0, 0));
        assert_eq!(clamp_local(f64::NAN, 49), 0);
        assert_eq!(parse_local("NaN"), 0.0);
        assert_eq!(parse_local(" 17 "), 17.0);
    }

    #[test]
    fn test_placement_needs_a_room() {
        assert!(MarkerDraft::new(MarkerKind::Spawn, "", 1.0, 1.0).place(1, 49).is_none());
    }

    #[test]
    fn test_shapes() {
        let circle = MarkerKind::Spawn.shape();
        assert!(circle.contains(&Point::new(3.0, 4.0)));
        assert!(!circle.contains(&Point::new(4.0, 4.0)));

        let square = MarkerKind::Extension.shape();
        assert!(square.contains(&Point::new(4.0, -4.0)));
        assert!(!square.contains(&Point::new(4.5, 0.0)));

        let tower = MarkerKind::Tower.shape();
        assert!(tower.contains(&Point::new(5.0, 0.0)));
        assert!(tower.contains(&Point::new(4.0, 4.0)));
        assert!(!tower.contains(&Point::new(4.9, 4.9)));
        assert_eq!(tower.half_extent(), 5.0);
    }

    #[test]
    fn test_marker_json_accepts_hp_alias() {
        let marker: Marker = serde_json::from_str(
            r#"{"id":"demo-spawn","kind":"spawn","room_name":"W0N0","x":24,"y":24,"hp":5000}"#,
        )
        .unwrap();
        assert_eq!(marker.durability, Some(5000));
        assert_eq!(marker.tooltip_lines().last().unwrap(), "Durability: 5000");
    }
}
