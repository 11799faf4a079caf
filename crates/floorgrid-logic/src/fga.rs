//! The (Floor, Group, Area) coordinate space shared by layout and ordering.
//!
//! A triple with a negative field is "unplaced": the grid ignores it and the
//! host positions the item some other way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (Floor, Group, Area) identifier triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fga {
    pub floor: i32,
    pub group: i32,
    pub area: i32,
}

impl Fga {
    pub const fn new(floor: i32, group: i32, area: i32) -> Self {
        Self { floor, group, area }
    }

    /// True when every field is non-negative and the triple takes part in
    /// grid layout.
    pub fn is_placed(&self) -> bool {
        self.floor >= 0 && self.group >= 0 && self.area >= 0
    }

    /// The same triple with its group replaced.
    pub fn with_group(self, group: i32) -> Self {
        Self { group, ..self }
    }
}

impl fmt::Display for Fga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}/G{}/A{}", self.floor, self.group, self.area)
    }
}

/// Width/height pair in presentation units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle; `y` grows downward like a screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `size`-sized rectangle at the origin.
    pub const fn at_origin(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placed() {
        assert!(Fga::new(0, 0, 0).is_placed());
        assert!(Fga::new(3, 7, 2).is_placed());
    }

    #[test]
    fn test_negative_field_is_unplaced() {
        assert!(!Fga::new(-1, 0, 0).is_placed());
        assert!(!Fga::new(0, -1, 0).is_placed());
        assert!(!Fga::new(0, 0, -5).is_placed());
    }

    #[test]
    fn test_with_group_keeps_floor_and_area() {
        let moved = Fga::new(2, 9, 4).with_group(1);
        assert_eq!(moved, Fga::new(2, 1, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Fga::new(1, 2, 3).to_string(), "F1/G2/A3");
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_string(&Fga::new(1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"floor":1,"group":2,"area":3}"#);
    }
}
