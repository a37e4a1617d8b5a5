//! `EightPuzzle`: the 3x3 sliding-tile puzzle.
//!
//! Boards are stored row-major with `0` for the gap. Actions name the
//! direction the gap moves, offered in the order Up, Down, Left, Right.
//! The default goal is the spiral layout `1 2 3 / 8 _ 4 / 7 6 5`.

use waymark_search::problem::{PathCost, Problem};

use crate::contract::SearchWorld;

/// A row-major board; `0` is the gap.
pub type Board = [u8; 9];

/// Spiral goal board.
pub const GOAL: Board = [1, 2, 3, 8, 0, 4, 7, 6, 5];

const SIDE: usize = 3;

/// Direction the gap moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Board offset of the tile the gap swaps with, if it stays on the board.
    fn target(self, gap: usize) -> Option<usize> {
        let (row, col) = (gap / SIDE, gap % SIDE);
        match self {
            Self::Up if row > 0 => Some(gap - SIDE),
            Self::Down if row + 1 < SIDE => Some(gap + SIDE),
            Self::Left if col > 0 => Some(gap - 1),
            Self::Right if col + 1 < SIDE => Some(gap + 1),
            _ => None,
        }
    }
}

/// One 8-puzzle instance: a start board and a goal board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EightPuzzle {
    start: Board,
    goal: Board,
}

impl EightPuzzle {
    /// Instance from `start` to [`GOAL`].
    #[must_use]
    pub fn new(start: Board) -> Self {
        Self { start, goal: GOAL }
    }

    #[must_use]
    pub fn with_goal(mut self, goal: Board) -> Self {
        self.goal = goal;
        self
    }

    #[must_use]
    pub fn start(&self) -> Board {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> Board {
        self.goal
    }

    /// Whether the goal is reachable from the start.
    ///
    /// On an odd-width board every move preserves the parity of the tile
    /// inversion count, so start and goal must agree on it.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        inversions(&self.start) % 2 == inversions(&self.goal) % 2
    }

    /// Sum of tile distances to their goal squares. Admissible.
    #[must_use]
    pub fn manhattan(&self, board: &Board) -> PathCost {
        (1..=8u8)
            .map(|tile| {
                let (at, home) = (position(board, tile), position(&self.goal, tile));
                let rows = (at / SIDE).abs_diff(home / SIDE);
                let cols = (at % SIDE).abs_diff(home % SIDE);
                PathCost::try_from(rows + cols).unwrap_or(PathCost::MAX)
            })
            .sum()
    }

    /// Number of tiles off their goal square. Admissible.
    #[must_use]
    pub fn misplaced_tiles(&self, board: &Board) -> PathCost {
        let misplaced = (1..=8u8)
            .filter(|&tile| position(board, tile) != position(&self.goal, tile))
            .count();
        PathCost::try_from(misplaced).unwrap_or(PathCost::MAX)
    }
}

fn position(board: &Board, tile: u8) -> usize {
    board.iter().position(|&t| t == tile).unwrap_or(0)
}

fn inversions(board: &Board) -> usize {
    let tiles: Vec<u8> = board.iter().copied().filter(|&t| t != 0).collect();
    tiles
        .iter()
        .enumerate()
        .map(|(i, a)| tiles[i + 1..].iter().filter(|b| *b < a).count())
        .sum()
}

impl Problem for EightPuzzle {
    type State = Board;
    type Action = Move;

    fn initial_state(&self) -> Board {
        self.start
    }

    fn actions(&self, board: &Board) -> Vec<Move> {
        let gap = position(board, 0);
        [Move::Up, Move::Down, Move::Left, Move::Right]
            .into_iter()
            .filter(|m| m.target(gap).is_some())
            .collect()
    }

    fn transition(&self, board: &Board, action: &Move) -> Board {
        let gap = position(board, 0);
        let mut next = *board;
        if let Some(target) = action.target(gap) {
            next.swap(gap, target);
        }
        next
    }

    fn is_goal(&self, board: &Board) -> bool {
        *board == self.goal
    }
}

impl SearchWorld for EightPuzzle {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "eight_puzzle"
    }

    fn fixture(&self) -> serde_json::Value {
        serde_json::json!({
            "goal": self.goal,
            "start": self.start,
        })
    }

    fn heuristic(&self, board: &Board) -> PathCost {
        self.manhattan(board)
    }
}
