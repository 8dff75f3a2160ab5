//! Packing problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{
    solve_parsed_puzzle, solve_puzzle, PackingOutcome, PackingProblem, PuzzleReport, TreeReport,
};
pub use solution::{placement_cells, Solution, SolutionMetadata, SolutionSummary};
pub use validator::{SolutionValidator, ValidationResult};
