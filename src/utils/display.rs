//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::packing::{PackingOutcome, PuzzleReport, Solution};
use crate::puzzle::Shape;
use anyhow::Result;
use std::path::Path;

/// Format solutions and reports for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution, shapes: &[Shape], show_placements: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Tree: {} ({}x{})\n",
                                solution.tree_index,
                                solution.tree.width,
                                solution.tree.height));
        output.push_str(&format!("Presents placed: {}\n", solution.metadata.presents_placed));
        output.push_str(&format!("Coverage: {:.1}%\n", solution.metadata.coverage * 100.0));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Search: {} steps, {} backtracks\n",
                                solution.metadata.search_steps,
                                solution.metadata.backtracks));
        output.push('\n');

        match solution.render(shapes) {
            Ok(tiling) => output.push_str(&tiling),
            Err(e) => output.push_str(&format!("(tiling unavailable: {})\n", e)),
        }

        if show_placements {
            output.push('\n');
            for placement in &solution.placements {
                output.push_str(&format!("  {}\n", placement));
            }
        }

        output
    }

    /// Format a puzzle report as a summary table
    pub fn format_report_summary(report: &PuzzleReport) -> String {
        let mut output = String::new();

        output.push_str("Tree | Outcome              | Steps    | Backtracks | Time(ms)\n");
        output.push_str("-----|----------------------|----------|------------|---------\n");

        for tree_report in &report.reports {
            output.push_str(&format!(
                "{:4} | {:20} | {:8} | {:10} | {}\n",
                tree_report.tree_index,
                tree_report.outcome.label(),
                tree_report.statistics.steps,
                tree_report.statistics.backtracks,
                tree_report.solve_time.as_millis()
            ));
        }

        output.push_str(&format!("\nTrees satisfiable: {}/{}\n", report.satisfied, report.total));
        output
    }

    /// Save the report's solutions based on output format
    pub fn save_solutions<P: AsRef<Path>>(
        report: &PuzzleReport,
        shapes: &[Shape],
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let solutions: Vec<&Solution> = report
            .reports
            .iter()
            .filter_map(|r| match &r.outcome {
                PackingOutcome::Satisfiable(solution) => Some(solution),
                _ => None,
            })
            .collect();

        match format {
            OutputFormat::Text => {
                for solution in &solutions {
                    let filename = format!("solution_tree{:03}.txt", solution.tree_index);
                    let content = Self::format_solution(solution, shapes, true);
                    std::fs::write(output_dir.join(filename), content)?;
                }
            }
            OutputFormat::Json => {
                for solution in &solutions {
                    let filename = format!("solution_tree{:03}.json", solution.tree_index);
                    solution.save_to_file(output_dir.join(filename))?;
                }

                // Also save a summary file
                let summaries: Vec<_> = solutions.iter().map(|s| s.summary()).collect();
                let summary_json = serde_json::to_string_pretty(&summaries)?;
                std::fs::write(output_dir.join("solutions_summary.json"), summary_json)?;
            }
            OutputFormat::Visual => {
                for solution in &solutions {
                    let filename = format!("solution_tree{:03}_visual.txt", solution.tree_index);
                    let content = solution.render(shapes)?;
                    std::fs::write(output_dir.join(filename), content)?;
                }
            }
        }

        Ok(())
    }
}

/// Progress indicator for long-running operations
pub struct ProgressIndicator {
    total: usize,
    current: usize,
    last_update: std::time::Instant,
    start_time: std::time::Instant,
}

impl ProgressIndicator {
    /// Create a new progress indicator
    pub fn new(total: usize) -> Self {
        let now = std::time::Instant::now();
        Self { total, current: 0, last_update: now, start_time: now }
    }

    /// Update progress and optionally display
    pub fn update(&mut self, current: usize) {
        self.current = current;
        let now = std::time::Instant::now();

        // Redraw at most every 100ms
        if now.duration_since(self.last_update).as_millis() > 100 {
            self.display();
            self.last_update = now;
        }
    }

    /// Display current progress
    pub fn display(&self) {
        let percentage = if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        };

        print!("\rProgress: {}/{} ({:.1}%)", self.current, self.total, percentage);
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    /// Finish and clear the progress line
    pub fn finish(&self) {
        println!(
            "\rCompleted: {}/{} - Total time: {:.1}s",
            self.total,
            self.total,
            self.start_time.elapsed().as_secs_f64()
        );
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::packing::solve_parsed_puzzle;
    use crate::puzzle::parse_puzzle_from_string;
    use tempfile::tempdir;

    fn sample_report() -> (PuzzleReport, Vec<Shape>) {
        let puzzle = parse_puzzle_from_string("0:\n##\n##\n\n2x2: 1\n4x1: 1\n").unwrap();
        let mut settings = Settings::default();
        settings.solver.parallel = false;
        let report = solve_parsed_puzzle(&puzzle, &settings).unwrap();
        (report, puzzle.shapes)
    }

    #[test]
    fn test_format_solution_contains_tiling() {
        let (report, shapes) = sample_report();
        let solution = match &report.reports[0].outcome {
            PackingOutcome::Satisfiable(solution) => solution,
            _ => panic!("expected satisfiable tree"),
        };

        let formatted = SolutionFormatter::format_solution(solution, &shapes, true);
        assert!(formatted.contains("AA\nAA\n"));
        assert!(formatted.contains("Presents placed: 1"));
    }

    #[test]
    fn test_report_summary_table() {
        let (report, _) = sample_report();
        let summary = SolutionFormatter::format_report_summary(&report);
        assert!(summary.contains("satisfiable"));
        assert!(summary.contains("unsatisfiable"));
        assert!(summary.contains("Trees satisfiable: 1/2"));
    }

    #[test]
    fn test_save_solutions_json() {
        let (report, shapes) = sample_report();
        let temp_dir = tempdir().unwrap();

        SolutionFormatter::save_solutions(&report, &shapes, temp_dir.path(), &OutputFormat::Json)
            .unwrap();

        assert!(temp_dir.path().join("solution_tree000.json").exists());
        assert!(temp_dir.path().join("solutions_summary.json").exists());
    }

    #[test]
    fn test_save_solutions_text() {
        let (report, shapes) = sample_report();
        let temp_dir = tempdir().unwrap();

        SolutionFormatter::save_solutions(&report, &shapes, temp_dir.path(), &OutputFormat::Text)
            .unwrap();

        assert!(temp_dir.path().join("solution_tree000.txt").exists());
    }

    #[test]
    fn test_progress_indicator() {
        let mut progress = ProgressIndicator::new(10);
        progress.update(5);
        assert_eq!(progress.current, 5);
        assert_eq!(progress.total, 10);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
