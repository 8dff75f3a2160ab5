//! Placement encoding: from a tree and its presents to an exact-cover matrix
//!
//! Columns are allocated cells-first in row-major order (secondary, at most
//! one present per cell), followed by one must-place column per present
//! instance (primary, exactly one placement each). Every legal placement of
//! an instance, meaning one deduplicated orientation at one in-bounds anchor,
//! becomes a row holding its occupied-cell columns plus its instance column.

use super::matrix::{ColumnKind, Matrix};
use crate::puzzle::{Rotation, Shape, Tree};
use anyhow::{Context, Result};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload of one placement row: which present copy sits where, and how.
/// Opaque to the search engine; rows refer back here by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Index among the tree's expanded present instances
    pub present: usize,
    /// Shape id in the catalog
    pub shape: usize,
    pub rotation: Rotation,
    /// Anchor of the oriented bounding box, top-left
    pub x: usize,
    pub y: usize,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "present {} (shape {}) at ({}, {}) rotated {}",
            self.present, self.shape, self.x, self.y, self.rotation
        )
    }
}

/// Builds the constraint matrix for one tree
pub struct PlacementEncoder<'a> {
    tree: &'a Tree,
    shapes: &'a [Shape],
}

/// The encoded matrix together with the row payload table
pub struct EncodedProblem {
    pub matrix: Matrix,
    /// Placement for each row, indexed by row id
    pub placements: Vec<Placement>,
    pub cell_columns: usize,
    pub instance_columns: usize,
}

impl<'a> PlacementEncoder<'a> {
    /// Create an encoder, rejecting malformed input before any matrix exists
    pub fn new(tree: &'a Tree, shapes: &'a [Shape]) -> Result<Self> {
        tree.validate_against(shapes)?;
        Ok(Self { tree, shapes })
    }

    /// Construct the matrix and the placement table
    pub fn encode(&self) -> Result<EncodedProblem> {
        let mut matrix = Matrix::new();

        for _ in 0..self.tree.cell_count() {
            matrix.add_column(ColumnKind::Secondary);
        }

        let instances = self.tree.instances();
        let instance_columns: Vec<usize> = instances
            .iter()
            .map(|_| matrix.add_column(ColumnKind::Primary))
            .collect();

        let mut placements = Vec::new();

        for (present, instance) in instances.iter().enumerate() {
            let shape = &self.shapes[instance.shape];

            for orientation in shape.orientations() {
                if orientation.width > self.tree.width || orientation.height > self.tree.height {
                    continue;
                }

                let max_y = self.tree.height - orientation.height;
                let max_x = self.tree.width - orientation.width;

                for (y, x) in iproduct!(0..=max_y, 0..=max_x) {
                    let mut columns: Vec<usize> = orientation
                        .cells_at(x, y)
                        .map(|(cx, cy)| self.tree.cell_index(cx, cy))
                        .collect();
                    columns.push(instance_columns[present]);

                    let row = matrix.add_row(&columns).with_context(|| {
                        format!(
                            "Failed to add placement row for present {} at ({}, {})",
                            present, x, y
                        )
                    })?;
                    debug_assert_eq!(row, placements.len());

                    placements.push(Placement {
                        present,
                        shape: instance.shape,
                        rotation: orientation.rotation,
                        x,
                        y,
                    });
                }
            }
        }

        Ok(EncodedProblem {
            matrix,
            placements,
            cell_columns: self.tree.cell_count(),
            instance_columns: instances.len(),
        })
    }
}

impl EncodedProblem {
    /// Structural statistics of the encoding
    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            cell_columns: self.cell_columns,
            instance_columns: self.instance_columns,
            rows: self.matrix.num_rows(),
            nodes: self.matrix.num_nodes(),
        }
    }

    /// Rough difficulty classification of the search space
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let rows = self.matrix.num_rows();

        let complexity_level = if rows < 100 {
            ComplexityLevel::Low
        } else if rows < 1_000 {
            ComplexityLevel::Medium
        } else if rows < 10_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            rows,
            nodes: self.matrix.num_nodes(),
            instances: self.instance_columns,
        }
    }
}

/// Statistics about the placement encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub cell_columns: usize,
    pub instance_columns: usize,
    pub rows: usize,
    pub nodes: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Encoding Statistics:")?;
        writeln!(f, "  Cell columns: {}", self.cell_columns)?;
        writeln!(f, "  Instance columns: {}", self.instance_columns)?;
        writeln!(f, "  Placement rows: {}", self.rows)?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        Ok(())
    }
}

/// Complexity estimate for one tree's search
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub rows: usize,
    pub nodes: usize,
    pub instances: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Complexity Estimate:")?;
        writeln!(f, "  Level: {:?}", self.complexity_level)?;
        writeln!(f, "  Placement rows: {}", self.rows)?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Present instances: {}", self.instances)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve instantly",
            ComplexityLevel::Medium => "Should solve quickly",
            ComplexityLevel::High => "May take noticeable time, consider a step limit",
            ComplexityLevel::VeryHigh => "Likely slow, a step limit is strongly recommended",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;
        Ok(())
    }
}
