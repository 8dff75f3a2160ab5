//! Packing problem orchestration
//!
//! `PackingProblem` wires one tree through the encoder, the exact-cover
//! engine, and the validator. `solve_puzzle` is the whole-file driver: every
//! tree gets its own freshly built matrix and an independent solve, which is
//! what makes the per-tree rayon fan-out safe.

use super::solution::Solution;
use super::validator::SolutionValidator;
use crate::config::Settings;
use crate::dlx::encoder::{ComplexityEstimate, EncodingStatistics};
use crate::dlx::{
    EncodedProblem, ExactCoverSolver, PlacementEncoder, SearchOptions, SearchOutcome,
    SearchStatistics,
};
use crate::puzzle::{load_puzzle_from_file, Puzzle, Shape, Tree};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

/// One tree's packing problem, encoded and ready to solve
pub struct PackingProblem<'a> {
    tree_index: usize,
    tree: Tree,
    shapes: &'a [Shape],
    options: SearchOptions,
    encoded: EncodedProblem,
}

/// Terminal outcome for one tree
#[derive(Debug, Clone)]
pub enum PackingOutcome {
    /// The presents fit; the witness passed independent validation
    Satisfiable(Solution),
    /// No arrangement of the presents fits
    Unsatisfiable,
    /// The step limit was reached; satisfiability is unknown
    StepLimit,
}

impl PackingOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, PackingOutcome::Satisfiable(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackingOutcome::Satisfiable(_) => "satisfiable",
            PackingOutcome::Unsatisfiable => "unsatisfiable",
            PackingOutcome::StepLimit => "unknown (step limit)",
        }
    }
}

/// Result of solving one tree
#[derive(Debug, Clone)]
pub struct TreeReport {
    pub tree_index: usize,
    pub outcome: PackingOutcome,
    pub statistics: SearchStatistics,
    pub solve_time: Duration,
}

/// Result of solving every tree in a puzzle file
#[derive(Debug, Clone)]
pub struct PuzzleReport {
    pub reports: Vec<TreeReport>,
    pub satisfied: usize,
    pub total: usize,
    pub total_time: Duration,
}

impl<'a> PackingProblem<'a> {
    /// Encode one tree against the shape catalog
    pub fn new(
        tree_index: usize,
        tree: Tree,
        shapes: &'a [Shape],
        options: SearchOptions,
    ) -> Result<Self> {
        let encoded = PlacementEncoder::new(&tree, shapes)?
            .encode()
            .with_context(|| format!("Failed to encode tree {}", tree_index))?;

        Ok(Self { tree_index, tree, shapes, options, encoded })
    }

    /// Encoding statistics for this tree
    pub fn statistics(&self) -> EncodingStatistics {
        self.encoded.statistics()
    }

    /// Search-space estimate for this tree
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoded.estimate_complexity()
    }

    /// Run the search and, on success, validate the witness
    pub fn solve(self) -> Result<TreeReport> {
        let start = Instant::now();

        let placements = self.encoded.placements;
        let mut solver = ExactCoverSolver::with_options(self.encoded.matrix, self.options);
        let search_outcome = solver.solve();
        let statistics = solver.statistics().clone();
        let solve_time = start.elapsed();

        let outcome = match search_outcome {
            SearchOutcome::Satisfiable(rows) => {
                let chosen = rows.iter().map(|&row| placements[row]).collect();
                let solution = Solution::new(
                    self.tree_index,
                    self.tree,
                    chosen,
                    self.shapes,
                    &statistics,
                    solve_time,
                );

                let validation = SolutionValidator::new(self.shapes).validate(&solution)?;
                if !validation.is_valid {
                    anyhow::bail!(
                        "Engine produced an invalid witness for tree {}: {}",
                        solution.tree_index,
                        validation.error_message.unwrap_or_default()
                    );
                }

                PackingOutcome::Satisfiable(solution)
            }
            SearchOutcome::Unsatisfiable => PackingOutcome::Unsatisfiable,
            SearchOutcome::StepLimit => PackingOutcome::StepLimit,
        };

        Ok(TreeReport { tree_index: self.tree_index, outcome, statistics, solve_time })
    }
}

/// Solve every tree in the configured puzzle file
pub fn solve_puzzle(settings: &Settings) -> Result<PuzzleReport> {
    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)
        .context("Failed to load puzzle file")?;

    solve_parsed_puzzle(&puzzle, settings)
}

/// Solve every tree of an already parsed puzzle
pub fn solve_parsed_puzzle(puzzle: &Puzzle, settings: &Settings) -> Result<PuzzleReport> {
    let start = Instant::now();
    let options = SearchOptions { step_limit: settings.solver.step_limit };

    let solve_one = |index: usize, tree: &Tree| -> Result<TreeReport> {
        PackingProblem::new(index, tree.clone(), &puzzle.shapes, options.clone())?.solve()
    };

    let reports: Result<Vec<TreeReport>> = if settings.solver.parallel {
        puzzle
            .trees
            .par_iter()
            .enumerate()
            .map(|(index, tree)| solve_one(index, tree))
            .collect()
    } else {
        puzzle
            .trees
            .iter()
            .enumerate()
            .map(|(index, tree)| solve_one(index, tree))
            .collect()
    };
    let reports = reports?;

    let satisfied = reports.iter().filter(|r| r.outcome.is_satisfiable()).count();

    Ok(PuzzleReport {
        satisfied,
        total: reports.len(),
        reports,
        total_time: start.elapsed(),
    })
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree {}: {} ({} steps, {} backtracks, {:.3}s)",
            self.tree_index,
            self.outcome.label(),
            self.statistics.steps,
            self.statistics.backtracks,
            self.solve_time.as_secs_f64()
        )
    }
}

impl fmt::Display for PuzzleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{}", report)?;
        }
        write!(
            f,
            "Trees satisfiable: {}/{} in {:.3}s",
            self.satisfied,
            self.total,
            self.total_time.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{parse_puzzle_from_string, Rotation};

    fn solve_tree(tree: Tree, shapes: &[Shape]) -> TreeReport {
        PackingProblem::new(0, tree, shapes, SearchOptions::default())
            .unwrap()
            .solve()
            .unwrap()
    }

    #[test]
    fn test_single_present_covering_whole_tree() {
        let shapes = vec![Shape::from_block(0, "###\n###\n###").unwrap()];
        let tree = Tree::new(3, 3, vec![1]).unwrap();

        let report = solve_tree(tree, &shapes);
        match &report.outcome {
            PackingOutcome::Satisfiable(solution) => {
                assert_eq!(solution.placements.len(), 1);
                assert_eq!(solution.metadata.covered_cells, 9);
            }
            other => panic!("expected satisfiable, got {}", other.label()),
        }
        assert_eq!(report.statistics.commits, 1);
    }

    #[test]
    fn test_present_without_any_placement() {
        // The 3x3 present cannot fit a 2x2 tree: its must-place column has
        // no candidates and the search fails before committing anything.
        let shapes = vec![Shape::from_block(0, "###\n###\n###").unwrap()];
        let tree = Tree::new(2, 2, vec![1]).unwrap();

        let report = solve_tree(tree, &shapes);
        assert!(matches!(report.outcome, PackingOutcome::Unsatisfiable));
        assert_eq!(report.statistics.commits, 0);
        assert_eq!(report.statistics.backtracks, 0);
    }

    #[test]
    fn test_conflicting_presents_exhaust_after_backtracking() {
        // A T-tetromino fits a 3x2 tree two ways, and either way splits the
        // leftover cells so the domino cannot land. Both branches must be
        // tried and undone.
        let shapes = vec![
            Shape::from_block(0, "###\n.#.").unwrap(),
            Shape::from_block(1, "##").unwrap(),
        ];
        let tree = Tree::new(3, 2, vec![1, 1]).unwrap();

        let report = solve_tree(tree, &shapes);
        assert!(matches!(report.outcome, PackingOutcome::Unsatisfiable));
        assert!(report.statistics.backtracks >= 2);
    }

    #[test]
    fn test_backtracking_then_success() {
        // Two copies of an L-tromino tile a 3x2 tree, but the first
        // placement tried for the first copy blocks the second copy
        // completely and must be discarded.
        let shapes = vec![Shape::from_block(0, "##\n.#").unwrap()];
        let tree = Tree::new(3, 2, vec![2]).unwrap();

        let report = solve_tree(tree, &shapes);
        match &report.outcome {
            PackingOutcome::Satisfiable(solution) => {
                assert_eq!(solution.placements.len(), 2);
                assert_eq!(solution.metadata.covered_cells, 6);
                // The surviving placement for the first copy is its second
                // candidate, anchored one cell to the right
                assert_eq!(solution.placements[0].rotation, Rotation::R0);
                assert_eq!((solution.placements[0].x, solution.placements[0].y), (1, 0));
            }
            other => panic!("expected satisfiable, got {}", other.label()),
        }
        assert!(report.statistics.backtracks >= 1);
    }

    #[test]
    fn test_witness_is_deterministic() {
        let shapes = vec![Shape::from_block(0, "##\n.#").unwrap()];
        let tree = Tree::new(3, 2, vec![2]).unwrap();

        let first = solve_tree(tree.clone(), &shapes);
        let second = solve_tree(tree, &shapes);

        match (&first.outcome, &second.outcome) {
            (PackingOutcome::Satisfiable(a), PackingOutcome::Satisfiable(b)) => {
                assert_eq!(a.placements, b.placements);
            }
            _ => panic!("expected both runs satisfiable"),
        }
    }

    #[test]
    fn test_tree_without_presents_is_trivially_satisfiable() {
        let shapes = vec![Shape::from_block(0, "##").unwrap()];
        let tree = Tree::new(3, 3, vec![0]).unwrap();

        let report = solve_tree(tree, &shapes);
        match &report.outcome {
            PackingOutcome::Satisfiable(solution) => assert!(solution.placements.is_empty()),
            other => panic!("expected satisfiable, got {}", other.label()),
        }
    }

    #[test]
    fn test_step_limit_reports_unknown() {
        let shapes = vec![Shape::from_block(0, "##\n.#").unwrap()];
        let tree = Tree::new(3, 2, vec![2]).unwrap();

        let problem =
            PackingProblem::new(0, tree, &shapes, SearchOptions { step_limit: Some(1) }).unwrap();
        let report = problem.solve().unwrap();
        assert!(matches!(report.outcome, PackingOutcome::StepLimit));
    }

    #[test]
    fn test_solve_parsed_puzzle_counts_satisfiable_trees() {
        let puzzle = parse_puzzle_from_string(
            "\
0:
##.
.#.
...

1:
##.
##.
...

2:
#..
#..
#..

4x2: 0 2 0
3x3: 1 0 1
2x2: 0 2 0
",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.solver.parallel = false;

        let report = solve_parsed_puzzle(&puzzle, &settings).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.satisfied, 2);
        assert!(report.reports[0].outcome.is_satisfiable());
        assert!(report.reports[1].outcome.is_satisfiable());
        assert!(matches!(report.reports[2].outcome, PackingOutcome::Unsatisfiable));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let puzzle = parse_puzzle_from_string(
            "\
0:
##
##

4x2: 2
2x2: 2
",
        )
        .unwrap();

        let mut sequential = Settings::default();
        sequential.solver.parallel = false;
        let mut parallel = Settings::default();
        parallel.solver.parallel = true;

        let a = solve_parsed_puzzle(&puzzle, &sequential).unwrap();
        let b = solve_parsed_puzzle(&puzzle, &parallel).unwrap();

        assert_eq!(a.satisfied, b.satisfied);
        assert_eq!(a.total, b.total);
    }
}
