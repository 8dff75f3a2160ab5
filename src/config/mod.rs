//! Configuration management for the present packing solver

pub mod settings;

pub use settings::{
    Settings, InputConfig, SolverConfig, OutputConfig, OutputFormat, CliOverrides,
};
