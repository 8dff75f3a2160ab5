//! Dancing-links exact-cover engine and the placement encoding on top of it

pub mod matrix;
pub mod encoder;
pub mod search;

pub use matrix::{ColumnKind, Matrix, MatrixError};
pub use encoder::{EncodedProblem, Placement, PlacementEncoder};
pub use search::{ExactCoverSolver, SearchOptions, SearchOutcome, SearchStatistics};
