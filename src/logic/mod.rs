use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::{
    data::{Board, GameParams, HiddenCell, Pos, VisibleCell},
    error::GameError,
};

/// Outcome of revealing a cell. Stepping on a mine ends the game but is an
/// expected result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed,
    SteppedOnMine,
}

/// Enumerates the in-bounds neighbors of a coordinate, at most 8 of them.
///
/// One bounds-clipped offset walk covers corners, edges and the interior
/// alike; corners simply yield fewer coordinates. Order is row-major
/// (`dy` outer, `dx` inner) and deterministic.
pub fn neighbors_of(pos: Pos, width: usize, height: usize) -> impl Iterator<Item = Pos> {
    (-1i32..=1).flat_map(move |dy| {
        (-1i32..=1).filter_map(move |dx| {
            if dx == 0 && dy == 0 {
                return None;
            }
            let x = pos.x as i32 + dx;
            let y = pos.y as i32 + dy;
            (x >= 0 && x < width as i32 && y >= 0 && y < height as i32)
                .then(|| Pos::new(x as usize, y as usize))
        })
    })
}

/// Number of mined neighbors of a coordinate, 0..=8.
pub fn mine_count_around(pos: Pos, board: &Board) -> u8 {
    neighbors_of(pos, board.width(), board.height())
        .filter(|&n| board.hidden_at(n) == Some(HiddenCell::Mine))
        .count() as u8
}

/// Annotates every mine-free cell with its adjacency count. Runs once,
/// after mine placement; hidden state is fixed from then on.
pub fn annotate_counts(board: &mut Board) -> Result<(), GameError> {
    for y in 0..board.height() {
        for x in 0..board.width() {
            let pos = Pos::new(x, y);
            if board.hidden_at(pos) == Some(HiddenCell::Mine) {
                continue;
            }
            board.set_adjacent_count(pos, mine_count_around(pos, board))?;
        }
    }
    Ok(())
}

/// Scatters `count` mines over distinct cells, uniformly at random.
///
/// Draws coordinates with replacement and retries collisions; the free
/// space shrinks strictly, so this terminates whenever the count fits the
/// board. Returns the mine set for the win check and the reveal boundary.
pub fn place_mines<R: Rng>(
    board: &mut Board,
    count: usize,
    rng: &mut R,
) -> Result<HashSet<Pos>, GameError> {
    if count > board.width() * board.height() {
        return Err(GameError::InvalidMineCount {
            count,
            width: board.width(),
            height: board.height(),
        });
    }

    let mut mines = HashSet::with_capacity(count);
    while mines.len() < count {
        let pos = Pos::new(
            rng.random_range(0..board.width()),
            rng.random_range(0..board.height()),
        );
        if mines.insert(pos) {
            board.set_mine(pos)?;
        }
    }
    Ok(mines)
}

/// Opens a cell and cascades through connected zero-count cells.
///
/// Returns `SteppedOnMine` without touching the board when the entry
/// coordinate is a mine. Otherwise walks the 8-adjacency graph with an
/// explicit stack and a visited set, so each cell is processed at most once
/// and the traversal is bounded by the board area:
///
/// - a numbered cell is revealed with its count and not descended into;
/// - a zero cell is revealed as empty and its neighbors are pushed;
/// - a flagged mine-free cell reached by the cascade loses its flag and is
///   revealed like any other;
/// - a mine reached by the cascade is left untouched, flagged or not. Only
///   the entry coordinate can end the game.
pub fn reveal_cell(
    board: &mut Board,
    mines: &HashSet<Pos>,
    start: Pos,
) -> Result<RevealOutcome, GameError> {
    if !board.contains(start) {
        return Err(GameError::OutOfBounds(start));
    }
    if mines.contains(&start) {
        return Ok(RevealOutcome::SteppedOnMine);
    }

    let mut visited = HashSet::new();
    let mut stack = vec![start];

    while let Some(pos) = stack.pop() {
        if !visited.insert(pos) {
            continue;
        }

        let count = match board.hidden_at(pos) {
            Some(HiddenCell::Clear(count)) => count,
            // Mines never open mid-cascade; zero cells have no mined
            // neighbors, so this only triggers next to corrected flags.
            Some(HiddenCell::Mine) | None => continue,
        };

        // An already revealed cell is a stop condition, not an error.
        if board
            .visible_at(pos)
            .is_some_and(|visible| visible.is_revealed())
        {
            continue;
        }
        board.reveal(pos, count)?;

        if count == 0 {
            stack.extend(neighbors_of(pos, board.width(), board.height()));
        }
    }

    Ok(RevealOutcome::Revealed)
}

/// True iff the flagged coordinates equal the mine set exactly.
///
/// Compares full set membership, not cardinality: a matching number of
/// flags in the wrong places is not a win.
pub fn check_win(board: &Board, mines: &HashSet<Pos>) -> bool {
    let mut flagged = 0usize;
    for y in 0..board.height() {
        for x in 0..board.width() {
            let pos = Pos::new(x, y);
            if board.visible_at(pos) == Some(VisibleCell::Flagged) {
                if !mines.contains(&pos) {
                    return false;
                }
                flagged += 1;
            }
        }
    }
    flagged == mines.len()
}

/// One game: the board plus its fixed mine set, owned as a plain value and
/// threaded through every operation. This is the whole surface the terminal
/// loop drives.
#[derive(Debug)]
pub struct Game {
    board: Board,
    mines: HashSet<Pos>,
}

impl Game {
    pub fn new<R: Rng>(params: &GameParams, rng: &mut R) -> Result<Self, GameError> {
        let mut board = Board::new(params.width, params.height)?;
        let mines = place_mines(&mut board, params.mines, rng)?;
        annotate_counts(&mut board)?;
        debug!(
            width = params.width,
            height = params.height,
            mines = mines.len(),
            "new game"
        );
        Ok(Self { board, mines })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<(), GameError> {
        self.board.toggle_flag(pos)
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome, GameError> {
        reveal_cell(&mut self.board, &self.mines, pos)
    }

    pub fn is_won(&self) -> bool {
        check_win(&self.board, &self.mines)
    }

    pub fn render_row(&self, y: usize) -> String {
        self.board.render_row(y)
    }
}
