//! Present shapes and their rotation variants

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clockwise rotation applied to a present's footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// All rotations in enumeration order
    pub fn all() -> [Rotation; 4] {
        [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270]
    }

    /// Rotation angle in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// A present shape: the set of occupied cells within its parsed footprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub id: usize,
    width: usize,
    height: usize,
    cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Create a shape from explicit occupied cells within a width x height footprint
    pub fn new(id: usize, width: usize, height: usize, cells: Vec<(usize, usize)>) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Shape {} footprint must have positive dimensions", id);
        }
        if cells.is_empty() {
            anyhow::bail!("Shape {} has no occupied cells", id);
        }
        for &(x, y) in &cells {
            if x >= width || y >= height {
                anyhow::bail!(
                    "Shape {} cell ({}, {}) extends outside its {}x{} footprint",
                    id, x, y, width, height
                );
            }
        }
        let mut sorted = cells.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != cells.len() {
            anyhow::bail!("Shape {} lists the same cell twice", id);
        }

        Ok(Self { id, width, height, cells })
    }

    /// Parse a shape from a text block of '#' (occupied) and '.' (empty) rows
    pub fn from_block(id: usize, block: &str) -> Result<Self> {
        let rows: Vec<&str> = block
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .collect();

        if rows.is_empty() {
            anyhow::bail!("Shape {} block is empty", id);
        }

        let width = rows[0].len();
        let height = rows.len();
        let mut cells = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!(
                    "Shape {} row {} has length {}, expected {}",
                    id, y, row.len(), width
                );
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => cells.push((x, y)),
                    '.' => {}
                    _ => anyhow::bail!(
                        "Invalid character '{}' in shape {} at ({}, {}). Only '#' and '.' are allowed",
                        ch, id, x, y
                    ),
                }
            }
        }

        Self::new(id, width, height, cells)
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Width of the parsed footprint
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the parsed footprint
    pub fn height(&self) -> usize {
        self.height
    }

    /// Occupied cells within the parsed footprint
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    /// Enumerate the distinct oriented variants of this shape.
    ///
    /// Rotations are generated clockwise in the order 0°, 90°, 180°, 270°,
    /// each normalized to its bounding box. A rotation whose normalized cell
    /// set matches an earlier one is dropped, so a full square yields one
    /// orientation and a straight bar two.
    pub fn orientations(&self) -> Vec<Orientation> {
        let mut variants: Vec<Orientation> = Vec::new();

        let mut width = self.width;
        let mut height = self.height;
        let mut cells = self.cells.clone();

        for rotation in Rotation::all() {
            let oriented = Orientation::normalized(rotation, &cells);
            if !variants.iter().any(|v| v.cells == oriented.cells) {
                variants.push(oriented);
            }

            // Rotate the working footprint clockwise for the next variant:
            // (x, y) in a w x h box maps to (h - 1 - y, x) in an h x w box.
            cells = cells.iter().map(|&(x, y)| (height - 1 - y, x)).collect();
            std::mem::swap(&mut width, &mut height);
        }

        variants
    }
}

/// One oriented variant of a shape, normalized to its bounding box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientation {
    pub rotation: Rotation,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<(usize, usize)>,
}

impl Orientation {
    fn normalized(rotation: Rotation, cells: &[(usize, usize)]) -> Self {
        let min_x = cells.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let min_y = cells.iter().map(|&(_, y)| y).min().unwrap_or(0);

        let mut shifted: Vec<(usize, usize)> =
            cells.iter().map(|&(x, y)| (x - min_x, y - min_y)).collect();
        shifted.sort();

        let width = shifted.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let height = shifted.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);

        Self { rotation, width, height, cells: shifted }
    }

    /// Absolute grid cells occupied when anchored at (x, y)
    pub fn cells_at(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(move |&(dx, dy)| (x + dx, y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let shape = Shape::from_block(0, "##.\n.#.\n...").unwrap();
        assert_eq!(shape.cell_count(), 3);
        assert_eq!(shape.cells(), &[(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Shape::from_block(0, "").is_err());
        assert!(Shape::from_block(0, "...\n...\n...").is_err());
        assert!(Shape::from_block(0, "##\n#").is_err());
        assert!(Shape::from_block(0, "#X\n##").is_err());
    }

    #[test]
    fn test_square_has_one_orientation() {
        let shape = Shape::from_block(0, "##\n##").unwrap();
        let orientations = shape.orientations();
        assert_eq!(orientations.len(), 1);
        assert_eq!(orientations[0].rotation, Rotation::R0);
    }

    #[test]
    fn test_bar_has_two_orientations() {
        let shape = Shape::from_block(0, "###").unwrap();
        let orientations = shape.orientations();
        assert_eq!(orientations.len(), 2);
        assert_eq!(orientations[0].rotation, Rotation::R0);
        assert_eq!(orientations[0].width, 3);
        assert_eq!(orientations[0].height, 1);
        assert_eq!(orientations[1].rotation, Rotation::R90);
        assert_eq!(orientations[1].width, 1);
        assert_eq!(orientations[1].height, 3);
    }

    #[test]
    fn test_l_shape_has_four_orientations() {
        let shape = Shape::from_block(0, "##\n.#").unwrap();
        let orientations = shape.orientations();
        assert_eq!(orientations.len(), 4);

        // 90° clockwise of {(0,0),(1,0),(1,1)} is {(0,1),(1,0),(1,1)}
        assert_eq!(orientations[1].cells, vec![(0, 1), (1, 0), (1, 1)]);
        // 180° is {(0,0),(0,1),(1,1)}
        assert_eq!(orientations[2].cells, vec![(0, 0), (0, 1), (1, 1)]);
        // 270° is {(0,0),(0,1),(1,0)}
        assert_eq!(orientations[3].cells, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_normalization_shifts_to_origin() {
        // Occupied cells hug the bottom-right of a 3x3 footprint
        let shape = Shape::new(0, 3, 3, vec![(2, 1), (2, 2), (1, 2)]).unwrap();
        let orientations = shape.orientations();
        assert_eq!(orientations[0].cells, vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(orientations[0].width, 2);
        assert_eq!(orientations[0].height, 2);
    }

    #[test]
    fn test_cells_at_offsets() {
        let shape = Shape::from_block(0, "##").unwrap();
        let orientation = &shape.orientations()[0];
        let cells: Vec<_> = orientation.cells_at(2, 1).collect();
        assert_eq!(cells, vec![(2, 1), (3, 1)]);
    }
}
