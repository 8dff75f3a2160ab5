//! Exact-cover search engine
//!
//! Iterative backtracking over a [`Matrix`]: an explicit stack of
//! (column, candidate) frames replaces recursion, and every commit keeps an
//! undo record so backtracking replays the unlinks in reverse. A solution is
//! reached when every primary column is resolved; secondary columns only
//! constrain, they never have to be covered.

use super::matrix::{ColumnKind, Matrix};
use std::fmt;

/// Tunable limits for a single search
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Abort after this many selection steps; `None` searches exhaustively.
    /// An aborted search means "unknown", not "unsatisfiable".
    pub step_limit: Option<u64>,
}

/// Terminal state of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An exact cover exists; the committed rows, in commit order
    Satisfiable(Vec<usize>),
    /// The entire search space was exhausted without a solution
    Unsatisfiable,
    /// The step limit was reached before the search terminated
    StepLimit,
}

impl SearchOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SearchOutcome::Satisfiable(_))
    }
}

/// Counters describing one search run
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Column-selection steps taken
    pub steps: u64,
    /// Rows committed (including ones later undone)
    pub commits: u64,
    /// Commits undone while backtracking
    pub backtracks: u64,
    /// Deepest committed-row stack reached
    pub max_depth: usize,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Steps: {}", self.steps)?;
        writeln!(f, "  Commits: {}", self.commits)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        Ok(())
    }
}

/// One level of the search stack: the selected column, the first candidate
/// tried in it, and the candidate currently committed
#[derive(Debug, Clone, Copy)]
struct Frame {
    column: usize,
    start: usize,
    node: usize,
}

/// Undo record for one committed row: the nodes unlinked by the commit, in
/// unlink order, and the columns it marked resolved
#[derive(Debug)]
struct CommitRecord {
    row: usize,
    unlinked: Vec<usize>,
    covered: Vec<usize>,
}

/// The search engine. Owns its matrix for the duration of the solve; the
/// matrix is restored to its pre-search state before any outcome is
/// returned, so a solver can be run repeatedly.
pub struct ExactCoverSolver {
    matrix: Matrix,
    options: SearchOptions,
    statistics: SearchStatistics,
}

impl ExactCoverSolver {
    /// Create a solver with default options
    pub fn new(matrix: Matrix) -> Self {
        Self::with_options(matrix, SearchOptions::default())
    }

    /// Create a solver with explicit options
    pub fn with_options(matrix: Matrix, options: SearchOptions) -> Self {
        Self { matrix, options, statistics: SearchStatistics::default() }
    }

    /// The underlying matrix
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Statistics of the most recent `solve` call
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Run the search to a terminal outcome
    pub fn solve(&mut self) -> SearchOutcome {
        self.statistics = SearchStatistics::default();

        let mut resolved = vec![false; self.matrix.num_columns()];
        let mut frames: Vec<Frame> = Vec::new();
        let mut commits: Vec<CommitRecord> = Vec::new();

        let outcome = loop {
            self.statistics.steps += 1;
            if let Some(limit) = self.options.step_limit {
                if self.statistics.steps > limit {
                    break SearchOutcome::StepLimit;
                }
            }

            match self.select_column(&resolved) {
                // Every primary constraint is resolved
                None => break SearchOutcome::Satisfiable(commits.iter().map(|c| c.row).collect()),

                // A required constraint has no candidates left in this branch
                Some(column) if self.matrix.column_count(column) == 0 => {
                    if !self.backtrack(&mut frames, &mut commits, &mut resolved) {
                        break SearchOutcome::Unsatisfiable;
                    }
                }

                Some(column) => {
                    let node = self
                        .matrix
                        .column_first(column)
                        .expect("a non-empty column has a representative");
                    commits.push(self.commit(node, &mut resolved));
                    frames.push(Frame { column, start: node, node });
                    self.statistics.commits += 1;
                    self.statistics.max_depth = self.statistics.max_depth.max(frames.len());
                }
            }
        };

        // Unwind whatever remains so the matrix ends exactly as it began
        while let Some(record) = commits.pop() {
            frames.pop();
            self.undo(record, &mut resolved);
        }

        outcome
    }

    /// Least-remaining-values selection over unresolved primary columns,
    /// ties broken toward the lower column id (the stable construction key)
    fn select_column(&self, resolved: &[bool]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for column in 0..self.matrix.num_columns() {
            if resolved[column] || self.matrix.column_kind(column) != ColumnKind::Primary {
                continue;
            }
            match best {
                Some(b) if self.matrix.column_count(column) >= self.matrix.column_count(b) => {}
                _ => best = Some(column),
            }
        }
        best
    }

    /// Commit a candidate row: cover every column the row touches by
    /// removing all of that column's remaining rows, whole row at a time.
    /// Every unlinked node is appended to the undo record in order.
    fn commit(&mut self, node: usize, resolved: &mut [bool]) -> CommitRecord {
        let row = self.matrix.node_row(node);
        let members: Vec<usize> = self.matrix.row_cycle(node).collect();

        let mut unlinked = Vec::new();
        let mut covered = Vec::with_capacity(members.len());

        for &member in &members {
            let column = self.matrix.node_column(member);
            debug_assert!(!resolved[column], "a live row touched a resolved column");

            while let Some(victim) = self.matrix.column_first(column) {
                let victim_row: Vec<usize> = self.matrix.row_cycle(victim).collect();
                for w in victim_row {
                    self.matrix.unlink(w);
                    unlinked.push(w);
                }
            }

            resolved[column] = true;
            covered.push(column);
        }

        CommitRecord { row, unlinked, covered }
    }

    /// Reverse one commit: clear its resolved marks and relink its nodes in
    /// strict LIFO order
    fn undo(&mut self, record: CommitRecord, resolved: &mut [bool]) {
        for &column in &record.covered {
            resolved[column] = false;
        }
        for &node in record.unlinked.iter().rev() {
            self.matrix.relink(node);
        }
    }

    /// Pop levels of the search stack until a level has an untried
    /// candidate, then commit it. Returns false when the stack is exhausted.
    fn backtrack(
        &mut self,
        frames: &mut Vec<Frame>,
        commits: &mut Vec<CommitRecord>,
        resolved: &mut [bool],
    ) -> bool {
        while let Some(frame) = frames.pop() {
            let record = commits.pop().expect("one commit record per frame");
            self.undo(record, resolved);
            self.statistics.backtracks += 1;

            // With the links restored, the column's cycle resumes where the
            // previous candidate left off
            let next = self.matrix.next_in_column(frame.node);
            if next != frame.start {
                commits.push(self.commit(next, resolved));
                frames.push(Frame { column: frame.column, start: frame.start, node: next });
                self.statistics.commits += 1;
                return true;
            }
        }
        false
    }
}
