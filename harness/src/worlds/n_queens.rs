//! `NQueens`: incremental N-queens.
//!
//! A state lists the row of the queen in each filled column, left to right.
//! An action places a queen in the next column on a row no placed queen
//! attacks, so every reachable state is conflict-free and the space is a
//! tree of depth N.

use waymark_search::problem::Problem;

use crate::contract::SearchWorld;

/// Row of a placed queen.
pub type Row = u8;

/// Incremental N-queens on an `n x n` board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NQueens {
    n: u8,
}

impl NQueens {
    #[must_use]
    pub fn new(n: u8) -> Self {
        Self { n }
    }

    #[must_use]
    pub fn size(&self) -> u8 {
        self.n
    }

    /// Whether a queen at (`col`, `row`) is attacked by any queen in `placed`.
    fn attacked(placed: &[Row], col: usize, row: Row) -> bool {
        placed.iter().enumerate().any(|(c, &r)| {
            r == row || usize::from(r.abs_diff(row)) == col - c
        })
    }

    /// Whether `queens` is a full board with no two queens attacking.
    #[must_use]
    pub fn is_solution(&self, queens: &[Row]) -> bool {
        queens.len() == usize::from(self.n)
            && queens
                .iter()
                .enumerate()
                .all(|(col, &row)| row < self.n && !Self::attacked(&queens[..col], col, row))
    }
}

impl Problem for NQueens {
    type State = Vec<Row>;
    type Action = Row;

    fn initial_state(&self) -> Vec<Row> {
        Vec::new()
    }

    fn actions(&self, placed: &Vec<Row>) -> Vec<Row> {
        let col = placed.len();
        if col >= usize::from(self.n) {
            return Vec::new();
        }
        (0..self.n)
            .filter(|&row| !Self::attacked(placed, col, row))
            .collect()
    }

    fn transition(&self, placed: &Vec<Row>, row: &Row) -> Vec<Row> {
        let mut next = placed.clone();
        next.push(*row);
        next
    }

    fn is_goal(&self, placed: &Vec<Row>) -> bool {
        placed.len() == usize::from(self.n)
    }
}

impl SearchWorld for NQueens {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "n_queens"
    }

    fn fixture(&self) -> serde_json::Value {
        serde_json::json!({ "n": self.n })
    }
}
