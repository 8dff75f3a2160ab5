//! Sparse constraint matrix with reversible links
//!
//! The matrix is an arena of nodes addressed by index. Each node carries
//! up/down/left/right neighbor indices forming two circular doubly-linked
//! lists: a vertical one per column and a horizontal one per row. Column
//! headers track a live node count and a representative member; row headers
//! track a representative member. Search mutates the structure exclusively
//! through `unlink`/`relink`, which must be paired in strict LIFO order.

use itertools::Itertools;
use thiserror::Error;

/// Errors surfaced while building a matrix. These indicate defects in the
/// code constructing the matrix, caught before any search begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("row must reference at least one column")]
    EmptyRow,
    #[error("row references unknown column {0}")]
    UnknownColumn(usize),
    #[error("row references column {0} more than once")]
    DuplicateColumn(usize),
}

/// Constraint kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Must be covered exactly once for a solution
    Primary,
    /// May be covered at most once; never drives column selection
    Secondary,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    up: usize,
    down: usize,
    left: usize,
    right: usize,
    column: usize,
    row: usize,
    linked: bool,
}

#[derive(Debug, Clone)]
struct Column {
    kind: ColumnKind,
    first: Option<usize>,
    count: usize,
}

#[derive(Debug, Clone)]
struct Row {
    first: Option<usize>,
}

/// The sparse exact-cover matrix
#[derive(Debug, Clone, Default)]
pub struct Matrix {
    nodes: Vec<Node>,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Matrix {
    /// Create an empty matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column header. Construction order is the stable key used to
    /// break ties during column selection.
    pub fn add_column(&mut self, kind: ColumnKind) -> usize {
        let id = self.columns.len();
        self.columns.push(Column { kind, first: None, count: 0 });
        id
    }

    /// Append a row covering the given columns. One node is created per
    /// column and linked to the end of both its column's vertical list and
    /// the new row's horizontal list.
    pub fn add_row(&mut self, columns: &[usize]) -> Result<usize, MatrixError> {
        if columns.is_empty() {
            return Err(MatrixError::EmptyRow);
        }
        for &column in columns {
            if column >= self.columns.len() {
                return Err(MatrixError::UnknownColumn(column));
            }
        }
        if let Some(&column) = columns.iter().duplicates().next() {
            return Err(MatrixError::DuplicateColumn(column));
        }

        let row = self.rows.len();
        self.rows.push(Row { first: None });

        for &column in columns {
            let node = self.nodes.len();
            self.nodes.push(Node {
                up: node,
                down: node,
                left: node,
                right: node,
                column,
                row,
                linked: true,
            });
            self.link_into_column(node, column);
            self.link_into_row(node, row);
        }

        Ok(row)
    }

    fn link_into_column(&mut self, node: usize, column: usize) {
        match self.columns[column].first {
            None => self.columns[column].first = Some(node),
            Some(first) => {
                let last = self.nodes[first].up;
                self.nodes[last].down = node;
                self.nodes[node].up = last;
                self.nodes[node].down = first;
                self.nodes[first].up = node;
            }
        }
        self.columns[column].count += 1;
    }

    fn link_into_row(&mut self, node: usize, row: usize) {
        match self.rows[row].first {
            None => self.rows[row].first = Some(node),
            Some(first) => {
                let last = self.nodes[first].left;
                self.nodes[last].right = node;
                self.nodes[node].left = last;
                self.nodes[node].right = first;
                self.nodes[first].left = node;
            }
        }
    }

    /// Remove a node from both of its circular lists, decrementing its
    /// column's live count and repairing representatives.
    pub fn unlink(&mut self, node: usize) {
        debug_assert!(self.nodes[node].linked, "unlink of an already unlinked node");

        let Node { up, down, left, right, column, row, .. } = self.nodes[node];
        self.nodes[up].down = down;
        self.nodes[down].up = up;
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.nodes[node].linked = false;

        let header = &mut self.columns[column];
        header.count -= 1;
        if header.count == 0 {
            header.first = None;
        } else if header.first == Some(node) {
            header.first = Some(down);
        }

        let header = &mut self.rows[row];
        if header.first == Some(node) {
            header.first = if right == node { None } else { Some(right) };
        }
    }

    /// Reinsert a node at its prior position. Must be called in the exact
    /// reverse order of the `unlink` calls it undoes; out-of-order relinks
    /// corrupt the structure silently.
    pub fn relink(&mut self, node: usize) {
        debug_assert!(!self.nodes[node].linked, "relink of a node that is still linked");

        let Node { up, down, left, right, column, row, .. } = self.nodes[node];
        self.nodes[up].down = node;
        self.nodes[down].up = node;
        self.nodes[left].right = node;
        self.nodes[right].left = node;
        self.nodes[node].linked = true;

        let header = &mut self.columns[column];
        header.count += 1;
        if header.first.is_none() {
            header.first = Some(node);
        }
        if self.rows[row].first.is_none() {
            self.rows[row].first = Some(node);
        }
    }

    /// Live node count of a column
    pub fn column_count(&self, column: usize) -> usize {
        self.columns[column].count
    }

    /// Constraint kind of a column
    pub fn column_kind(&self, column: usize) -> ColumnKind {
        self.columns[column].kind
    }

    /// Representative live node of a column, if any
    pub fn column_first(&self, column: usize) -> Option<usize> {
        self.columns[column].first
    }

    /// Owning column of a node
    pub fn node_column(&self, node: usize) -> usize {
        self.nodes[node].column
    }

    /// Owning row of a node
    pub fn node_row(&self, node: usize) -> usize {
        self.nodes[node].row
    }

    /// Whether a node is currently a member of its lists
    pub fn is_linked(&self, node: usize) -> bool {
        self.nodes[node].linked
    }

    /// Successor of a node in its column's vertical cycle
    pub fn next_in_column(&self, node: usize) -> usize {
        self.nodes[node].down
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of currently linked nodes
    pub fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.linked).count()
    }

    /// Per-column live counts, for snapshot comparisons
    pub fn column_counts(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.count).collect()
    }

    /// Iterate the live members of a node's row, starting at the node and
    /// following `right` until it comes back around (inclusive, each once)
    pub fn row_cycle(&self, node: usize) -> CycleIter<'_> {
        debug_assert!(self.nodes[node].linked);
        CycleIter { matrix: self, start: node, next: Some(node), direction: Direction::Right }
    }

    /// Iterate the live members of a node's column, starting at the node
    pub fn column_cycle(&self, node: usize) -> CycleIter<'_> {
        debug_assert!(self.nodes[node].linked);
        CycleIter { matrix: self, start: node, next: Some(node), direction: Direction::Down }
    }

    /// Iterate the live members of a column from its representative
    pub fn column_members(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        self.columns[column]
            .first
            .into_iter()
            .flat_map(move |first| self.column_cycle(first))
    }

    /// Iterate the live members of a row from its representative
    pub fn row_members(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[row]
            .first
            .into_iter()
            .flat_map(move |first| self.row_cycle(first))
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Right,
    Down,
}

/// Finite, restartable traversal of one circular list
pub struct CycleIter<'a> {
    matrix: &'a Matrix,
    start: usize,
    next: Option<usize>,
    direction: Direction,
}

impl<'a> Iterator for CycleIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        let follow = match self.direction {
            Direction::Right => self.matrix.nodes[current].right,
            Direction::Down => self.matrix.nodes[current].down,
        };
        self.next = if follow == self.start { None } else { Some(follow) };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_sample() -> Matrix {
        // Three columns; rows {0,2}, {1}, {1,2}
        let mut matrix = Matrix::new();
        for _ in 0..3 {
            matrix.add_column(ColumnKind::Primary);
        }
        matrix.add_row(&[0, 2]).unwrap();
        matrix.add_row(&[1]).unwrap();
        matrix.add_row(&[1, 2]).unwrap();
        matrix
    }

    #[test]
    fn test_construction_counts() {
        let matrix = build_sample();
        assert_eq!(matrix.num_columns(), 3);
        assert_eq!(matrix.num_rows(), 3);
        assert_eq!(matrix.num_nodes(), 5);
        assert_eq!(matrix.column_counts(), vec![1, 2, 2]);
    }

    #[test]
    fn test_add_row_validation() {
        let mut matrix = Matrix::new();
        matrix.add_column(ColumnKind::Primary);

        assert_eq!(matrix.add_row(&[]), Err(MatrixError::EmptyRow));
        assert_eq!(matrix.add_row(&[5]), Err(MatrixError::UnknownColumn(5)));
        assert_eq!(matrix.add_row(&[0, 0]), Err(MatrixError::DuplicateColumn(0)));
    }

    #[test]
    fn test_row_cycle_visits_each_member_once() {
        let matrix = build_sample();
        let first = matrix.column_first(0).unwrap();
        let members: Vec<usize> = matrix.row_cycle(first).collect();
        assert_eq!(members.len(), 2);
        assert_eq!(matrix.node_column(members[0]), 0);
        assert_eq!(matrix.node_column(members[1]), 2);
    }

    #[test]
    fn test_column_cycle_follows_insertion_order() {
        let matrix = build_sample();
        let members: Vec<usize> = matrix.column_members(2).collect();
        assert_eq!(members.len(), 2);
        assert_eq!(matrix.node_row(members[0]), 0);
        assert_eq!(matrix.node_row(members[1]), 2);
    }

    #[test]
    fn test_unlink_relink_restores_structure() {
        let mut matrix = build_sample();
        let before_counts = matrix.column_counts();
        let node = matrix.column_first(2).unwrap();

        matrix.unlink(node);
        assert!(!matrix.is_linked(node));
        assert_eq!(matrix.column_count(2), 1);
        assert_eq!(matrix.column_members(2).count(), 1);

        matrix.relink(node);
        assert!(matrix.is_linked(node));
        assert_eq!(matrix.column_counts(), before_counts);
        assert_eq!(matrix.column_members(2).count(), 2);
    }

    #[test]
    fn test_unlink_empties_column() {
        let mut matrix = build_sample();
        let node = matrix.column_first(0).unwrap();

        matrix.unlink(node);
        assert_eq!(matrix.column_count(0), 0);
        assert_eq!(matrix.column_first(0), None);
        assert_eq!(matrix.column_members(0).count(), 0);

        matrix.relink(node);
        assert_eq!(matrix.column_first(0), Some(node));
    }

    #[test]
    fn test_lifo_unlink_relink_round_trip() {
        let mut matrix = build_sample();
        let before = matrix.column_counts();

        let unlinked: Vec<usize> = matrix.column_members(1).collect();
        for &node in &unlinked {
            matrix.unlink(node);
        }
        assert_eq!(matrix.column_count(1), 0);

        for &node in unlinked.iter().rev() {
            matrix.relink(node);
        }
        assert_eq!(matrix.column_counts(), before);
        assert_eq!(matrix.live_nodes(), matrix.num_nodes());
    }
}
