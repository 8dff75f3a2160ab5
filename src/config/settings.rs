//! Configuration settings for the present packing solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Abort a tree's search after this many steps and report it unknown
    pub step_limit: Option<u64>,
    /// Solve independent trees on the rayon thread pool
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_solutions: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                puzzle_file: PathBuf::from("input/puzzles/example.txt"),
            },
            solver: SolverConfig {
                step_limit: None,
                parallel: true,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_solutions: false,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.step_limit == Some(0) {
            anyhow::bail!("Step limit must be positive when set");
        }

        if !self.input.puzzle_file.exists() {
            anyhow::bail!("Puzzle file does not exist: {}", self.input.puzzle_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(step_limit) = cli_overrides.step_limit {
            self.solver.step_limit = Some(step_limit);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if cli_overrides.sequential {
            self.solver.parallel = false;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub puzzle_file: Option<PathBuf>,
    pub step_limit: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub sequential: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.solver.step_limit, None);
        assert!(settings.solver.parallel);
        assert!(!settings.output.save_solutions);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        let puzzle_path = temp_dir.path().join("puzzle.txt");
        std::fs::write(&puzzle_path, "0:\n##\n\n2x1: 1\n").unwrap();

        let mut settings = Settings::default();
        settings.input.puzzle_file = puzzle_path;
        settings.solver.step_limit = Some(5000);
        settings.to_file(&config_path).unwrap();

        let loaded = Settings::from_file(&config_path).unwrap();
        assert_eq!(loaded.solver.step_limit, Some(5000));
        assert_eq!(loaded.input.puzzle_file, settings.input.puzzle_file);
    }

    #[test]
    fn test_validate_missing_puzzle_file() {
        let mut settings = Settings::default();
        settings.input.puzzle_file = PathBuf::from("/definitely/not/there.txt");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_zero_step_limit() {
        let mut settings = Settings::default();
        settings.solver.step_limit = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            puzzle_file: Some(PathBuf::from("other.txt")),
            step_limit: Some(100),
            output_dir: None,
            sequential: true,
        };

        settings.merge_with_cli(&overrides);
        assert_eq!(settings.input.puzzle_file, PathBuf::from("other.txt"));
        assert_eq!(settings.solver.step_limit, Some(100));
        assert!(!settings.solver.parallel);
        assert_eq!(settings.output.output_directory, PathBuf::from("output/solutions"));
    }
}
