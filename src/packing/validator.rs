//! Independent verification of packing witnesses
//!
//! The validator re-derives every placement's cells from the shape catalog
//! and checks the exact-cover contract without consulting the search engine:
//! placements stay in bounds, no cell is claimed twice, and every present
//! instance is placed exactly once.

use super::solution::{placement_cells, Solution};
use crate::puzzle::Shape;
use anyhow::Result;
use std::fmt;

/// Validates solutions against a shape catalog
pub struct SolutionValidator<'a> {
    shapes: &'a [Shape],
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub placements_checked: usize,
    pub cells_covered: usize,
    pub bounds_violations: Vec<BoundsViolation>,
    pub overlap_violations: Vec<OverlapViolation>,
    pub multiplicity_violations: Vec<MultiplicityViolation>,
    pub shape_mismatches: Vec<ShapeMismatch>,
}

/// A placement cell falling outside the tree grid
#[derive(Debug, Clone)]
pub struct BoundsViolation {
    pub present: usize,
    pub cell: (usize, usize),
}

/// Two placements claiming the same cell
#[derive(Debug, Clone)]
pub struct OverlapViolation {
    pub cell: (usize, usize),
    pub presents: (usize, usize),
}

/// A present instance placed zero or more than one time
#[derive(Debug, Clone)]
pub struct MultiplicityViolation {
    pub present: usize,
    pub times_placed: usize,
}

/// A placement whose declared shape disagrees with the instance it names
#[derive(Debug, Clone)]
pub struct ShapeMismatch {
    pub present: usize,
    pub declared_shape: usize,
    pub expected_shape: usize,
}

impl<'a> SolutionValidator<'a> {
    /// Create a new solution validator over a shape catalog
    pub fn new(shapes: &'a [Shape]) -> Self {
        Self { shapes }
    }

    /// Check a witness against the exact-cover contract
    pub fn validate(&self, solution: &Solution) -> Result<ValidationResult> {
        let tree = &solution.tree;
        let instances = tree.instances();

        let mut details = ValidationDetails {
            placements_checked: solution.placements.len(),
            ..Default::default()
        };

        // Every instance exactly once
        let mut placed = vec![0usize; instances.len()];
        for placement in &solution.placements {
            match placed.get_mut(placement.present) {
                Some(count) => *count += 1,
                None => details.multiplicity_violations.push(MultiplicityViolation {
                    present: placement.present,
                    times_placed: 1,
                }),
            }

            if let Some(instance) = instances.get(placement.present) {
                if instance.shape != placement.shape {
                    details.shape_mismatches.push(ShapeMismatch {
                        present: placement.present,
                        declared_shape: placement.shape,
                        expected_shape: instance.shape,
                    });
                }
            }
        }
        for (present, &count) in placed.iter().enumerate() {
            if count != 1 {
                details
                    .multiplicity_violations
                    .push(MultiplicityViolation { present, times_placed: count });
            }
        }

        // Bounds and overlap, from independently re-derived cells
        let mut occupancy: Vec<Option<usize>> = vec![None; tree.cell_count()];
        for placement in &solution.placements {
            for (x, y) in placement_cells(placement, self.shapes)? {
                if x >= tree.width || y >= tree.height {
                    details
                        .bounds_violations
                        .push(BoundsViolation { present: placement.present, cell: (x, y) });
                    continue;
                }

                let index = tree.cell_index(x, y);
                match occupancy[index] {
                    Some(other) => details.overlap_violations.push(OverlapViolation {
                        cell: (x, y),
                        presents: (other, placement.present),
                    }),
                    None => {
                        occupancy[index] = Some(placement.present);
                        details.cells_covered += 1;
                    }
                }
            }
        }

        let is_valid = details.bounds_violations.is_empty()
            && details.overlap_violations.is_empty()
            && details.multiplicity_violations.is_empty()
            && details.shape_mismatches.is_empty();

        let error_message = if is_valid { None } else { Some(Self::describe(&details)) };

        Ok(ValidationResult { is_valid, error_message, details })
    }

    fn describe(details: &ValidationDetails) -> String {
        let mut message = String::new();

        if !details.bounds_violations.is_empty() {
            message.push_str(&format!(
                "{} placement cell(s) outside the grid. ",
                details.bounds_violations.len()
            ));
        }
        if !details.overlap_violations.is_empty() {
            message.push_str(&format!(
                "{} cell(s) covered more than once. ",
                details.overlap_violations.len()
            ));
        }
        if !details.multiplicity_violations.is_empty() {
            message.push_str(&format!(
                "{} present instance(s) not placed exactly once. ",
                details.multiplicity_violations.len()
            ));
        }
        if !details.shape_mismatches.is_empty() {
            message.push_str(&format!(
                "{} placement(s) declare the wrong shape. ",
                details.shape_mismatches.len()
            ));
        }

        message.trim_end().to_string()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Placements checked: {}", self.details.placements_checked)?;
        writeln!(f, "Cells covered: {}", self.details.cells_covered)?;
        writeln!(f, "Bounds violations: {}", self.details.bounds_violations.len())?;
        writeln!(f, "Overlap violations: {}", self.details.overlap_violations.len())?;
        writeln!(f, "Multiplicity violations: {}", self.details.multiplicity_violations.len())?;

        Ok(())
    }
}
