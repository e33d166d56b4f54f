//! Room names and room-grid coordinates.
//!
//! Rooms are named by quadrant and distance from the world origin: `W3N4`
//! is the fourth column west and the fifth row north. Columns west of the
//! origin and rows north of it map to negative grid coordinates, so `W0`
//! sits at x = -1 and `E0` at x = 0 with no gap or overlap between them.
//!
//! Decoding is total: anything that is not a valid room name decodes to the
//! origin room `(0, 0)` rather than failing, which keeps every projection
//! built on top of it well defined.

use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer position of a room in the infinite room lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoomCoord {
    pub x: i32,
    pub y: i32,
}

impl RoomCoord {
    pub const ORIGIN: RoomCoord = RoomCoord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decodes a room name, falling back to the origin on malformed input
    pub fn from_room_name(name: &str) -> Self {
        parse_parts(name).unwrap_or(Self::ORIGIN)
    }

    /// The canonical (uppercase) name of the room at this coordinate
    pub fn room_name(&self) -> RoomName {
        RoomName(encode(self.x, self.y))
    }

    pub fn offset(&self, dx: i32, dy: i32) -> RoomCoord {
        RoomCoord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A validated room name in canonical uppercase form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomName(String);

impl RoomName {
    /// Parses and normalizes a room name, returning `None` when it is malformed
    pub fn parse(name: &str) -> Option<Self> {
        parse_parts(name).map(|coord| coord.room_name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn coord(&self) -> RoomCoord {
        RoomCoord::from_room_name(&self.0)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomName {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| MapError::InvalidRoomName(s.to_string()))
    }
}

impl TryFrom<String> for RoomName {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RoomName> for String {
    fn from(name: RoomName) -> Self {
        name.0
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decodes an optional room name; `None`, empty and malformed input all yield the origin
pub fn decode(name: Option<&str>) -> RoomCoord {
    name.map(RoomCoord::from_room_name).unwrap_or(RoomCoord::ORIGIN)
}

/// Encodes a grid coordinate as its canonical room name
pub fn encode(x: i32, y: i32) -> String {
    // -(v + 1) is the inverse of the -n-1 decode rule and cannot overflow for negative v
    let (h_dir, h_pos) = if x >= 0 { ('E', x) } else { ('W', -(x + 1)) };
    let (v_dir, v_pos) = if y >= 0 { ('S', y) } else { ('N', -(y + 1)) };
    format!("{h_dir}{h_pos}{v_dir}{v_pos}")
}

/// Uppercase canonical form of a valid room name (`w1n0` -> `W1N0`, `E007S1` -> `E7S1`)
pub fn normalize(name: &str) -> Option<String> {
    RoomName::parse(name).map(String::from)
}

/// Room names in the square of `radius` rooms around `center`.
///
/// Ordered column by column: the outer loop walks x from `-radius` to `radius`,
/// the inner loop walks y the same way.
pub fn room_grid(center: RoomCoord, radius: u32) -> Vec<RoomName> {
    let r = radius.min(i32::MAX as u32) as i32;
    let side = 2 * radius as usize + 1;
    let mut rooms = Vec::with_capacity(side * side);
    for dx in -r..=r {
        for dy in -r..=r {
            rooms.push(center.offset(dx, dy).room_name());
        }
    }
    rooms
}

/// Matches `^[WE]\d+[NS]\d+$` case-insensitively
fn parse_parts(name: &str) -> Option<RoomCoord> {
    let bytes = name.as_bytes();
    let h_dir = bytes.first()?.to_ascii_uppercase();
    if h_dir != b'W' && h_dir != b'E' {
        return None;
    }

    let rest = &name[1..];
    let split = rest.find(|c: char| !c.is_ascii_digit())?;
    let (h_digits, rest) = rest.split_at(split);
    let v_dir = rest.as_bytes().first()?.to_ascii_uppercase();
    if v_dir != b'N' && v_dir != b'S' {
        return None;
    }
    let v_digits = &rest[1..];

    let h_pos = parse_distance(h_digits)?;
    let v_pos = parse_distance(v_digits)?;

    let x = if h_dir == b'W' { -h_pos - 1 } else { h_pos };
    let y = if v_dir == b'N' { -v_pos - 1 } else { v_pos };
    Some(RoomCoord::new(x, y))
}

fn parse_distance(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_quadrants() {
        assert_eq!(RoomCoord::from_room_name("E0S0"), RoomCoord::new(0, 0));
        assert_eq!(RoomCoord::from_room_name("W0N0"), RoomCoord::new(-1, -1));
        assert_eq!(RoomCoord::from_room_name("W1N0"), RoomCoord::new(-2, -1));
        assert_eq!(RoomCoord::from_room_name("E0N0"), RoomCoord::new(0, -1));
        assert_eq!(RoomCoord::from_room_name("E12S34"), RoomCoord::new(12, 34));
        assert_eq!(RoomCoord::from_room_name("w3n4"), RoomCoord::new(-4, -5));
    }

    #[test]
    fn test_malformed_names_fall_back_to_origin() {
        assert_eq!(decode(Some("")), RoomCoord::ORIGIN);
        assert_eq!(decode(None), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("bogus")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("W1")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("W1N")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("N1W1")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("W1N1 ")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("W-1N1")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("W1N99999999999")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("É1N1")), RoomCoord::ORIGIN);
    }

    #[test]
    fn test_encode_is_inverse_of_decode() {
        let samples = [
            0,
            1,
            -1,
            2,
            -2,
            49,
            -50,
            12_345,
            -12_346,
            i32::MAX,
            i32::MIN,
            i32::MIN + 1,
        ];
        for &x in &samples {
            for &y in &samples {
                let name = encode(x, y);
                assert_eq!(
                    RoomCoord::from_room_name(&name),
                    RoomCoord::new(x, y),
                    "round trip failed for {name}"
                );
            }
        }
    }

    #[test]
    fn test_normalize_valid_names() {
        assert_eq!(normalize("w0n0").as_deref(), Some("W0N0"));
        assert_eq!(normalize("e5S12").as_deref(), Some("E5S12"));
        assert_eq!(normalize("E007S1").as_deref(), Some("E7S1"));
        assert_eq!(normalize("nope"), None);

        for name in ["W0N0", "E0S0", "W10S3", "E42N17"] {
            assert_eq!(RoomCoord::from_room_name(name).room_name().as_str(), name);
        }
    }

    #[test]
    fn test_strict_parse() {
        assert!("w2s2".parse::<RoomName>().is_ok());
        assert!(matches!(
            "X2S2".parse::<RoomName>(),
            Err(MapError::InvalidRoomName(_))
        ));
    }

    #[test]
    fn test_room_name_serde() {
        let name: RoomName = serde_json::from_str("\"e1n1\"").unwrap();
        assert_eq!(name.as_str(), "E1N1");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"E1N1\"");
        assert!(serde_json::from_str::<RoomName>("\"bad\"").is_err());
    }

    #[test]
    fn test_room_grid_order() {
        let grid = room_grid(RoomCoord::from_room_name("W0N0"), 1);
        let names: Vec<&str> = grid.iter().map(RoomName::as_str).collect();
        assert_eq!(
            names,
            vec!["W1N1", "W1N0", "W1S0", "W0N1", "W0N0", "W0S0", "E0N1", "E0N0", "E0S0"]
        );
        assert_eq!(room_grid(RoomCoord::ORIGIN, 2).len(), 25);
        assert_eq!(room_grid(RoomCoord::ORIGIN, 0).len(), 1);
    }
}
