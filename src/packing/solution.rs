//! Solution representation for present packing problems

use crate::dlx::{Placement, SearchStatistics};
use crate::puzzle::{Shape, Tree};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A witness that a tree is satisfiable: the committed placements in the
/// order the search chose them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Index of the tree within its puzzle file
    pub tree_index: usize,
    /// The tree this solution packs
    pub tree: Tree,
    /// One placement per present instance, in commit order
    pub placements: Vec<Placement>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
    /// Metadata about the solution
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the placement set
    pub id: String,
    /// Number of presents placed
    pub presents_placed: usize,
    /// Grid cells occupied by presents
    pub covered_cells: usize,
    /// Fraction of the grid occupied (0.0 to 1.0)
    pub coverage: f64,
    /// Selection steps the search took
    pub search_steps: u64,
    /// Commits undone while searching
    pub backtracks: u64,
}

/// Resolve the absolute grid cells a placement occupies.
///
/// The rotation recorded in a placement always names one of the shape's
/// deduplicated orientations; a miss means the placement does not belong to
/// this catalog.
pub fn placement_cells(placement: &Placement, shapes: &[Shape]) -> Result<Vec<(usize, usize)>> {
    let shape = shapes
        .get(placement.shape)
        .ok_or_else(|| anyhow::anyhow!("Placement references unknown shape {}", placement.shape))?;

    let orientation = shape
        .orientations()
        .into_iter()
        .find(|o| o.rotation == placement.rotation)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Shape {} has no distinct {} orientation",
                placement.shape, placement.rotation
            )
        })?;

    Ok(orientation.cells_at(placement.x, placement.y).collect())
}

impl Solution {
    /// Create a solution and derive its metadata
    pub fn new(
        tree_index: usize,
        tree: Tree,
        placements: Vec<Placement>,
        shapes: &[Shape],
        statistics: &SearchStatistics,
        solve_time: Duration,
    ) -> Self {
        let metadata = SolutionMetadata::analyze(&tree, &placements, shapes, statistics);

        Self { tree_index, tree, placements, solve_time, metadata }
    }

    /// Render the tiling: one letter per present instance, '.' for free cells
    pub fn render(&self, shapes: &[Shape]) -> Result<String> {
        let mut grid = vec!['.'; self.tree.cell_count()];

        for placement in &self.placements {
            let letter = (b'A' + (placement.present % 26) as u8) as char;
            for (x, y) in placement_cells(placement, shapes)? {
                if x >= self.tree.width || y >= self.tree.height {
                    anyhow::bail!(
                        "Placement cell ({}, {}) is outside the {}x{} tree",
                        x, y, self.tree.width, self.tree.height
                    );
                }
                grid[self.tree.cell_index(x, y)] = letter;
            }
        }

        let mut out = String::with_capacity(self.tree.cell_count() + self.tree.height);
        for y in 0..self.tree.height {
            for x in 0..self.tree.width {
                out.push(grid[self.tree.cell_index(x, y)]);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Get a summary of the solution
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            tree_index: self.tree_index,
            width: self.tree.width,
            height: self.tree.height,
            presents_placed: self.metadata.presents_placed,
            coverage: self.metadata.coverage,
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

impl SolutionMetadata {
    /// Analyze a placement set and create metadata
    pub fn analyze(
        tree: &Tree,
        placements: &[Placement],
        shapes: &[Shape],
        statistics: &SearchStatistics,
    ) -> Self {
        let covered_cells: usize = placements
            .iter()
            .map(|p| shapes.get(p.shape).map_or(0, |s| s.cell_count()))
            .sum();

        Self {
            id: Self::generate_id(placements),
            presents_placed: placements.len(),
            covered_cells,
            coverage: covered_cells as f64 / tree.cell_count() as f64,
            search_steps: statistics.steps,
            backtracks: statistics.backtracks,
        }
    }

    /// Generate an identifier from the placement set
    fn generate_id(placements: &[Placement]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        placements.hash(&mut hasher);

        format!("pack_{:x}", hasher.finish())
    }
}

/// Summary of a solution for display purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub tree_index: usize,
    pub width: usize,
    pub height: usize,
    pub presents_placed: usize,
    pub coverage: f64,
    pub solve_time_ms: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: tree {} ({}x{}), {} presents, {:.0}% covered, {}ms",
            self.id,
            self.tree_index,
            self.width,
            self.height,
            self.presents_placed,
            self.coverage * 100.0,
            self.solve_time_ms
        )
    }
}
