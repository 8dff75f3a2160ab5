//! Present Packing Solver
//!
//! This library decides whether a multiset of polyomino "presents" can be
//! placed on rectangular "tree" grids without overlap, honoring present
//! multiplicities and rotation variants. The core is a from-scratch
//! exact-cover engine over a dancing-links sparse matrix.

pub mod config;
pub mod puzzle;
pub mod dlx;
pub mod packing;
pub mod utils;

pub use config::Settings;
pub use packing::{PackingOutcome, PuzzleReport, Solution};

use anyhow::Result;

/// Main entry point: solve every tree in the configured puzzle file
pub fn solve_packing(settings: &Settings) -> Result<PuzzleReport> {
    packing::solve_puzzle(settings)
}
