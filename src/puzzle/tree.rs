//! Tree geometry and present multiplicities

use super::Shape;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular tree grid together with how many copies of each present
/// shape must be placed on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub width: usize,
    pub height: usize,
    /// One count per shape id, in catalog order
    pub present_counts: Vec<usize>,
}

/// One concrete copy of a shape that must be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentInstance {
    pub shape: usize,
    /// Ordinal among the instances of the same shape
    pub copy: usize,
}

impl Tree {
    /// Create a tree, validating its geometry
    pub fn new(width: usize, height: usize, present_counts: Vec<usize>) -> Result<Self> {
        let tree = Self { width, height, present_counts };
        tree.validate()?;
        Ok(tree)
    }

    /// Validate geometry; shape-count consistency is checked against a catalog
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!(
                "Tree dimensions must be positive, got {}x{}",
                self.width, self.height
            );
        }
        Ok(())
    }

    /// Check the count list against the shape catalog
    pub fn validate_against(&self, shapes: &[Shape]) -> Result<()> {
        self.validate()?;
        if self.present_counts.len() > shapes.len() {
            anyhow::bail!(
                "Tree lists {} present counts but the catalog has only {} shapes",
                self.present_counts.len(),
                shapes.len()
            );
        }
        Ok(())
    }

    /// Convert 2D coordinates to a cell index
    #[inline]
    pub fn cell_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Total number of grid cells
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Expand the per-shape counts into the ordered list of instances
    pub fn instances(&self) -> Vec<PresentInstance> {
        self.present_counts
            .iter()
            .enumerate()
            .flat_map(|(shape, &count)| (0..count).map(move |copy| PresentInstance { shape, copy }))
            .collect()
    }

    /// Total number of present instances to place
    pub fn instance_count(&self) -> usize {
        self.present_counts.iter().sum()
    }

    /// Total cells the presents would occupy, given the catalog
    pub fn demanded_cells(&self, shapes: &[Shape]) -> usize {
        self.present_counts
            .iter()
            .enumerate()
            .map(|(shape, &count)| count * shapes.get(shape).map_or(0, |s| s.cell_count()))
            .sum()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} tree, {} presents", self.width, self.height, self.instance_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_creation() {
        let tree = Tree::new(4, 3, vec![1, 0, 2]).unwrap();
        assert_eq!(tree.cell_count(), 12);
        assert_eq!(tree.instance_count(), 3);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(Tree::new(0, 3, vec![1]).is_err());
        assert!(Tree::new(3, 0, vec![1]).is_err());
    }

    #[test]
    fn test_instance_expansion() {
        let tree = Tree::new(4, 4, vec![2, 0, 1]).unwrap();
        let instances = tree.instances();
        assert_eq!(
            instances,
            vec![
                PresentInstance { shape: 0, copy: 0 },
                PresentInstance { shape: 0, copy: 1 },
                PresentInstance { shape: 2, copy: 0 },
            ]
        );
    }

    #[test]
    fn test_count_list_longer_than_catalog() {
        let shapes = vec![Shape::from_block(0, "##").unwrap()];
        let tree = Tree::new(2, 2, vec![1, 1]).unwrap();
        assert!(tree.validate_against(&shapes).is_err());
    }

    #[test]
    fn test_demanded_cells() {
        let shapes = vec![
            Shape::from_block(0, "##").unwrap(),
            Shape::from_block(1, "##\n##").unwrap(),
        ];
        let tree = Tree::new(4, 4, vec![2, 1]).unwrap();
        assert_eq!(tree.demanded_cells(&shapes), 8);
    }

    #[test]
    fn test_cell_index() {
        let tree = Tree::new(5, 2, vec![]).unwrap();
        assert_eq!(tree.cell_index(0, 0), 0);
        assert_eq!(tree.cell_index(4, 1), 9);
    }
}
