//! Puzzle file parsing and writing
//!
//! A puzzle document lists present shapes followed by tree lines:
//!
//! ```text
//! 0:
//! ##.
//! .#.
//! ...
//!
//! 1:
//! ##
//! ##
//!
//! 4x3: 1 2
//! 5x2: 0 1
//! ```
//!
//! Each `N:` header starts a shape block of '#'/'.' rows; each `WxH: c0 c1 …`
//! line declares a tree with one present count per shape.

use super::{Shape, Tree};
use anyhow::{Context, Result};
use std::path::Path;

/// A parsed puzzle document: the shape catalog plus the trees to solve
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub shapes: Vec<Shape>,
    pub trees: Vec<Tree>,
}

impl Puzzle {
    /// Validate every tree against the shape catalog
    pub fn validate(&self) -> Result<()> {
        if self.shapes.is_empty() {
            anyhow::bail!("Puzzle declares no present shapes");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate_against(&self.shapes)
                .with_context(|| format!("Tree {} is invalid", i))?;
        }
        Ok(())
    }
}

/// Load a puzzle from a text file
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<Puzzle> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;

    parse_puzzle_from_string(&content)
        .with_context(|| format!("Failed to parse puzzle file: {}", path.as_ref().display()))
}

/// Parse a puzzle from its string representation
pub fn parse_puzzle_from_string(content: &str) -> Result<Puzzle> {
    let mut shapes = Vec::new();
    let mut trees = Vec::new();

    let mut current_block: Option<(usize, Vec<String>)> = None;

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() {
            finish_shape_block(&mut current_block, &mut shapes)?;
            continue;
        }

        if let Some(id_text) = line.strip_suffix(':') {
            if let Ok(id) = id_text.parse::<usize>() {
                finish_shape_block(&mut current_block, &mut shapes)?;
                if id != shapes.len() {
                    anyhow::bail!(
                        "Shape id {} on line {} is out of sequence, expected {}",
                        id,
                        line_no + 1,
                        shapes.len()
                    );
                }
                current_block = Some((id, Vec::new()));
                continue;
            }
        }

        if line.chars().all(|c| c == '#' || c == '.') {
            match current_block {
                Some((_, ref mut rows)) => rows.push(line.to_string()),
                None => anyhow::bail!(
                    "Footprint row on line {} appears outside a shape block",
                    line_no + 1
                ),
            }
            continue;
        }

        if let Some(tree) = parse_tree_line(line) {
            finish_shape_block(&mut current_block, &mut shapes)?;
            trees.push(tree.with_context(|| format!("Invalid tree on line {}", line_no + 1))?);
            continue;
        }

        anyhow::bail!("Unrecognized line {}: '{}'", line_no + 1, line);
    }

    finish_shape_block(&mut current_block, &mut shapes)?;

    let puzzle = Puzzle { shapes, trees };
    puzzle.validate()?;
    Ok(puzzle)
}

fn finish_shape_block(
    block: &mut Option<(usize, Vec<String>)>,
    shapes: &mut Vec<Shape>,
) -> Result<()> {
    if let Some((id, rows)) = block.take() {
        let shape = Shape::from_block(id, &rows.join("\n"))
            .with_context(|| format!("Invalid shape block {}", id))?;
        shapes.push(shape);
    }
    Ok(())
}

/// Parse a `WxH: c0 c1 …` tree line; returns None if the line does not
/// have that overall form (so other line kinds can be tried first)
fn parse_tree_line(line: &str) -> Option<Result<Tree>> {
    let (dims, counts) = line.split_once(':')?;
    let (w, h) = dims.trim().split_once('x')?;

    let width = w.trim().parse::<usize>().ok()?;
    let height = h.trim().parse::<usize>().ok()?;

    let parsed_counts: Result<Vec<usize>> = counts
        .split_whitespace()
        .map(|c| {
            c.parse::<usize>()
                .with_context(|| format!("Invalid present count '{}'", c))
        })
        .collect();

    Some(parsed_counts.and_then(|present_counts| Tree::new(width, height, present_counts)))
}

/// Write a puzzle back to its text representation
pub fn puzzle_to_string(puzzle: &Puzzle) -> String {
    let mut out = String::new();

    for shape in &puzzle.shapes {
        out.push_str(&format!("{}:\n", shape.id));
        for y in 0..shape.height() {
            for x in 0..shape.width() {
                out.push(if shape.cells().contains(&(x, y)) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out.push('\n');
    }

    for tree in &puzzle.trees {
        out.push_str(&format!("{}x{}:", tree.width, tree.height));
        for count in &tree.present_counts {
            out.push_str(&format!(" {}", count));
        }
        out.push('\n');
    }

    out
}

/// Save a puzzle to a text file
pub fn save_puzzle_to_file<P: AsRef<Path>>(puzzle: &Puzzle, path: P) -> Result<()> {
    let content = puzzle_to_string(puzzle);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write puzzle to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create an example puzzle file for testing and setup
pub fn create_example_puzzle<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let example = "\
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
";

    std::fs::write(dir.join("example.txt"), example)
        .context("Failed to write example.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
0:
##.
.#.
...

1:
##
##

4x3: 1 1
2x2: 0 1
";

    #[test]
    fn test_parse_puzzle() {
        let puzzle = parse_puzzle_from_string(SAMPLE).unwrap();

        assert_eq!(puzzle.shapes.len(), 2);
        assert_eq!(puzzle.shapes[0].cell_count(), 3);
        assert_eq!(puzzle.shapes[1].cell_count(), 4);

        assert_eq!(puzzle.trees.len(), 2);
        assert_eq!(puzzle.trees[0].width, 4);
        assert_eq!(puzzle.trees[0].height, 3);
        assert_eq!(puzzle.trees[0].present_counts, vec![1, 1]);
        assert_eq!(puzzle.trees[1].present_counts, vec![0, 1]);
    }

    #[test]
    fn test_parse_rejects_out_of_sequence_ids() {
        let content = "1:\n##\n\n2x2: 1\n";
        assert!(parse_puzzle_from_string(content).is_err());
    }

    #[test]
    fn test_parse_rejects_orphan_footprint_rows() {
        let content = "##\n##\n\n2x2: 1\n";
        assert!(parse_puzzle_from_string(content).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_lines() {
        let content = "0:\n##\n\nnot a tree line\n";
        assert!(parse_puzzle_from_string(content).is_err());
    }

    #[test]
    fn test_parse_rejects_zero_size_tree() {
        let content = "0:\n##\n\n0x3: 1\n";
        assert!(parse_puzzle_from_string(content).is_err());
    }

    #[test]
    fn test_parse_rejects_too_many_counts() {
        let content = "0:\n##\n\n3x3: 1 1\n";
        assert!(parse_puzzle_from_string(content).is_err());
    }

    #[test]
    fn test_round_trip() {
        let puzzle = parse_puzzle_from_string(SAMPLE).unwrap();
        let text = puzzle_to_string(&puzzle);
        let reparsed = parse_puzzle_from_string(&text).unwrap();

        assert_eq!(puzzle.shapes, reparsed.shapes);
        assert_eq!(puzzle.trees, reparsed.trees);
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("puzzle.txt");

        let puzzle = parse_puzzle_from_string(SAMPLE).unwrap();
        save_puzzle_to_file(&puzzle, &path).unwrap();
        let loaded = load_puzzle_from_file(&path).unwrap();

        assert_eq!(puzzle.shapes, loaded.shapes);
        assert_eq!(puzzle.trees, loaded.trees);
    }

    #[test]
    fn test_create_example_puzzle() {
        let temp_dir = tempdir().unwrap();
        create_example_puzzle(temp_dir.path()).unwrap();

        let puzzle = load_puzzle_from_file(temp_dir.path().join("example.txt")).unwrap();
        assert_eq!(puzzle.shapes.len(), 3);
        assert_eq!(puzzle.trees.len(), 3);
    }
}
