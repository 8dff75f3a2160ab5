//! Present and tree domain model

pub mod shape;
pub mod tree;
pub mod io;

pub use shape::{Orientation, Rotation, Shape};
pub use tree::{PresentInstance, Tree};
pub use io::{load_puzzle_from_file, parse_puzzle_from_string, save_puzzle_to_file, create_example_puzzle, Puzzle};
