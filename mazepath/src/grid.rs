use crate::classify::Cell;
use crate::error::GridError;
use crate::find::{MapStorage, MapTrait, NodeReference};
use std::{fmt::Display, str::FromStr};

use image::Rgb;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl NodeReference for Point {}

/// A MapTrait implementation over a rectangular grid of classified pixels.
///
/// Cells are stored row-major and never change once the grid is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Unchecked serialized form of a GridMap
#[derive(Serialize, Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for GridMap {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        GridMap::new(data.width, data.height, data.cells)
    }
}

impl From<GridMap> for GridData {
    fn from(map: GridMap) -> Self {
        GridData {
            width: map.width,
            height: map.height,
            cells: map.cells,
        }
    }
}

/// Number of cells in a width x height grid, rejecting empty or overflowing shapes
fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::MalformedGrid { width, height });
    }

    width
        .checked_mul(height)
        .ok_or(GridError::TooLarge { width, height })
}

impl GridMap {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                got: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A grid without any walls
    pub fn open(width: usize, height: usize) -> Result<Self, GridError> {
        Self::new(width, height, vec![Cell::Open; cell_count(width, height)?])
    }

    /// Classify every pixel of a width x height raster, `pixel_at` is called with (x, y)
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixel_at: impl Fn(usize, usize) -> Rgb<u8>,
    ) -> Result<Self, GridError> {
        let mut cells = Vec::with_capacity(cell_count(width, height)?);

        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::from_pixel(pixel_at(x, y)));
            }
        }

        Self::new(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, point: Point) -> Option<Cell> {
        if self.is_valid(point) {
            Some(self.cells[point.y * self.width + point.x])
        } else {
            None
        }
    }

    /// Returns a copy of the map scaled by the given factor, i.e. to make it twice as large, pass 2.
    /// Every cell is repeated into a factor x factor block.
    pub fn scaled(&self, factor: usize) -> Result<GridMap, GridError> {
        if factor == 0 {
            return Err(GridError::InvalidScale);
        }

        let too_large = || GridError::TooLarge {
            width: self.width.saturating_mul(factor),
            height: self.height.saturating_mul(factor),
        };
        let width = self.width.checked_mul(factor).ok_or_else(too_large)?;
        let height = self.height.checked_mul(factor).ok_or_else(too_large)?;
        let mut cells = Vec::with_capacity(cell_count(width, height)?);

        for y in 0..height {
            for x in 0..width {
                cells.push(self.cells[(y / factor) * self.width + x / factor]);
            }
        }

        GridMap::new(width, height, cells)
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the textual form produced by `Display`. `X` or `#` is a wall, a space or
/// `.` is open.
impl FromStr for GridMap {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut width = None;
        let mut cells = Vec::new();
        let mut height = 0;

        for (y, line) in s.lines().enumerate() {
            let row = line
                .chars()
                .map(|c| match c {
                    'X' | '#' => Ok(Cell::Wall),
                    ' ' | '.' => Ok(Cell::Open),
                    _ => Err(anyhow::anyhow!("Invalid cell {:?} on line {}", c, y + 1)),
                })
                .collect::<Result<Vec<_>, _>>()?;

            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(anyhow::anyhow!(
                        "Line {} has {} cells, expected {}",
                        y + 1,
                        row.len(),
                        w
                    ))
                }
                Some(_) => {}
            }

            cells.extend(row);
            height += 1;
        }

        Ok(GridMap::new(width.unwrap_or(0), height, cells)?)
    }
}

impl MapTrait for GridMap {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.x < self.width && node.y < self.height
    }

    fn validate(&self, node: Self::Reference) -> Result<(), GridError> {
        if self.is_valid(node) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                point: node,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn is_passable(&self, node: Self::Reference) -> bool {
        self.get(node).is_some_and(|cell| cell.is_passable())
    }

    /// Neighbors come in the order north, south, east, west
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        let mut points = Vec::with_capacity(4);

        if !self.is_valid(node) {
            return points.into_iter();
        }

        if node.y > 0 {
            points.push(Point::new(node.x, node.y - 1));
        }
        if node.y + 1 < self.height {
            points.push(Point::new(node.x, node.y + 1));
        }
        if node.x + 1 < self.width {
            points.push(Point::new(node.x + 1, node.y));
        }
        if node.x > 0 {
            points.push(Point::new(node.x - 1, node.y));
        }

        // filter to only keep open cells
        points.retain(|p| self.is_passable(*p));

        points.into_iter()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            width: self.width,
            height: self.height,
            values: vec![Default::default(); self.width * self.height],
        }
    }

    fn check_storage<T: Default + Copy + Clone + 'static>(
        &self,
        storage: &Self::Storage<T>,
    ) -> Result<(), GridError> {
        if storage.width == self.width && storage.height == self.height {
            Ok(())
        } else {
            Err(GridError::StorageMismatch {
                width: self.width,
                height: self.height,
                got_width: storage.width,
                got_height: storage.height,
            })
        }
    }
}

/// A MapStorage with one value per grid cell, laid out like the GridMap
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    width: usize,
    height: usize,
    values: Vec<T>,
}

impl<T: Default + Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.x < self.width && node.y < self.height
    }

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.y * self.width + node.x]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.y * self.width + node.x]
    }

    fn reset(&mut self) {
        self.values.fill(T::default());
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.width) {
            for value in row {
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
