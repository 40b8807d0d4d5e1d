use std::fmt::Display;

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Returns true if a pixel can be walked on.
///
/// Only pure black is a wall; white and every other color (e.g. the colored
/// start and goal markers) are open.
pub fn classify(pixel: Rgb<u8>) -> bool {
    pixel.0 != [0, 0, 0]
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Open,
}

impl Cell {
    pub fn from_pixel(pixel: Rgb<u8>) -> Self {
        classify(pixel).into()
    }

    pub fn is_passable(&self) -> bool {
        matches!(self, Cell::Open)
    }
}

impl From<bool> for Cell {
    fn from(passable: bool) -> Self {
        if passable {
            Cell::Open
        } else {
            Cell::Wall
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "X",
                Cell::Open => " ",
            }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_only_black_is_wall() {
        assert!(!classify(Rgb([0, 0, 0])));
        assert!(classify(Rgb([255, 255, 255])));
        assert!(classify(Rgb([1, 0, 0])));
        assert!(classify(Rgb([0, 0, 1])));
        // dark gray is still open, there is no threshold
        assert!(classify(Rgb([10, 10, 10])));
    }

    #[test]
    fn test_marker_colors_are_open() {
        assert_eq!(Cell::from_pixel(Rgb([255, 0, 0])), Cell::Open);
        assert_eq!(Cell::from_pixel(Rgb([0, 255, 0])), Cell::Open);
        assert_eq!(Cell::from_pixel(Rgb([0, 0, 0])), Cell::Wall);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}{}", Cell::Wall, Cell::Open), "X ");
    }
}
