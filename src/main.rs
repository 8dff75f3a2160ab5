//! Main CLI application for the present packing solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use present_packing::{
    config::{CliOverrides, Settings},
    dlx::SearchOptions,
    packing::{solve_parsed_puzzle, PackingOutcome, PackingProblem, Solution, SolutionValidator},
    puzzle::{create_example_puzzle, load_puzzle_from_file},
    utils::{ColorOutput, ProgressIndicator, SolutionFormatter},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "present_packing")]
#[command(about = "Present packing exact-cover solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every tree in a puzzle file
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Abort each tree after this many search steps (overrides config)
        #[arg(short, long)]
        step_limit: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Solve trees one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Print the tiling of every satisfiable tree
        #[arg(long)]
        show_tilings: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a saved solution against its puzzle
    Validate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Solution file (JSON)
        #[arg(short, long)]
        solution: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,
    },

    /// Report encoding statistics and complexity per tree without solving
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config, puzzle, step_limit, output,
            sequential, show_tilings, verbose
        } => {
            solve_command(config, puzzle, step_limit, output, sequential, show_tilings, verbose)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
        Commands::Validate { config, solution, puzzle } => {
            validate_command(config, solution, puzzle)
        }
        Commands::Analyze { config, puzzle } => {
            analyze_command(config, puzzle)
        }
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Ok(Settings::default())
    }
}

fn solve_command(
    config_path: PathBuf,
    puzzle_file: Option<PathBuf>,
    step_limit: Option<u64>,
    output_dir: Option<PathBuf>,
    sequential: bool,
    show_tilings: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("Present packing solver"));

    let mut settings = load_settings(&config_path)?;

    // Apply CLI overrides
    let cli_overrides = CliOverrides {
        puzzle_file,
        step_limit,
        output_dir: output_dir.clone(),
        sequential,
    };
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        println!("  Step limit: {:?}", settings.solver.step_limit);
        println!("  Parallel: {}", settings.solver.parallel);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    settings.validate()
        .context("Configuration validation failed")?;

    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)?;
    println!("Loaded {} shapes and {} trees", puzzle.shapes.len(), puzzle.trees.len());

    let report = solve_parsed_puzzle(&puzzle, &settings)
        .context("Failed to solve puzzle")?;

    println!();
    println!("{}", SolutionFormatter::format_report_summary(&report));

    if show_tilings {
        for tree_report in &report.reports {
            if let PackingOutcome::Satisfiable(solution) = &tree_report.outcome {
                println!("{}", SolutionFormatter::format_solution(solution, &puzzle.shapes, verbose));
            }
        }
    }

    if settings.output.save_solutions || output_dir.is_some() {
        SolutionFormatter::save_solutions(
            &report,
            &puzzle.shapes,
            &settings.output.output_directory,
            &settings.output.format,
        )
        .context("Failed to save solutions")?;

        println!("{}", ColorOutput::success(&format!(
            "Solutions saved to {}",
            settings.output.output_directory.display()
        )));
    }

    println!("{}", ColorOutput::success(&format!(
        "{}/{} trees satisfiable in {:.3}s",
        report.satisfied,
        report.total,
        report.total_time.as_secs_f64()
    )));

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings.to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Example puzzle
    create_example_puzzle(&input_dir)
        .context("Failed to create example puzzle")?;
    println!("Created example puzzle in: {}", input_dir.display());

    // Example configuration variant with a bounded search
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut bounded_config = Settings::default();
    bounded_config.solver.step_limit = Some(100_000);
    bounded_config.solver.parallel = false;
    bounded_config.to_file(&examples_dir.join("bounded.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("{}", ColorOutput::success("Setup complete"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your puzzles to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(
    config_path: PathBuf,
    solution_path: PathBuf,
    puzzle_file: Option<PathBuf>,
) -> Result<()> {
    println!("{}", ColorOutput::info("Validating solution..."));

    let mut settings = load_settings(&config_path)?;
    if let Some(puzzle_file) = puzzle_file {
        settings.input.puzzle_file = puzzle_file;
    }

    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)?;
    let solution = Solution::load_from_file(&solution_path)
        .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?;

    let validator = SolutionValidator::new(&puzzle.shapes);
    let result = validator.validate(&solution)?;

    println!("{}", result);

    if result.is_valid {
        println!("{}", solution.render(&puzzle.shapes)?);
        println!("{}", ColorOutput::success("Solution is valid"));
    } else {
        println!("{}", ColorOutput::error("Solution is invalid"));
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, puzzle_file: Option<PathBuf>) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing puzzle..."));

    let mut settings = load_settings(&config_path)?;
    if let Some(puzzle_file) = puzzle_file {
        settings.input.puzzle_file = puzzle_file;
    }

    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)?;
    println!("Shapes: {}, Trees: {}", puzzle.shapes.len(), puzzle.trees.len());

    let mut progress = ProgressIndicator::new(puzzle.trees.len());
    let mut analyses = Vec::new();

    for (index, tree) in puzzle.trees.iter().enumerate() {
        let problem =
            PackingProblem::new(index, tree.clone(), &puzzle.shapes, SearchOptions::default())?;
        analyses.push((index, tree.clone(), problem.statistics(), problem.estimate_complexity()));
        progress.update(index + 1);
    }
    progress.finish();

    for (index, tree, statistics, complexity) in analyses {
        println!("\nTree {} ({}):", index, tree);
        println!("  Cells: {}, demanded by presents: {}",
                tree.cell_count(),
                tree.demanded_cells(&puzzle.shapes));
        print!("{}", statistics);
        print!("{}", complexity);
    }

    Ok(())
}
