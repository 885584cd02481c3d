use thiserror::Error;

use crate::data::Pos;

/// Everything that can go wrong while setting up or mutating a board.
///
/// Stepping on a mine is deliberately absent: that is a normal end of game,
/// reported through `RevealOutcome`, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("cannot place {count} mines on a {width}x{height} board")]
    InvalidMineCount {
        count: usize,
        width: usize,
        height: usize,
    },

    #[error("coordinate {0} is out of bounds")]
    OutOfBounds(Pos),

    #[error("cell {0} is already revealed")]
    AlreadyRevealed(Pos),

    #[error("cell {0} is a mine and carries no adjacency count")]
    InvalidState(Pos),
}
