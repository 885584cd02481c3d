use std::fmt;

use crate::error::GameError;

/// A board coordinate: column `x`, row `y`, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: 9,
            height: 9,
            mines: 10,
        }
    }
}

/// Ground truth for one cell. Fixed once mines are placed and counts are
/// computed; never exposed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenCell {
    Mine,
    /// Mine-free cell annotated with the number of mined neighbors (0..=8).
    Clear(u8),
}

/// What the player is allowed to see at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleCell {
    Untouched,
    Flagged,
    Revealed(u8),
    RevealedEmpty,
}

impl VisibleCell {
    pub fn is_revealed(self) -> bool {
        matches!(self, VisibleCell::Revealed(_) | VisibleCell::RevealedEmpty)
    }
}

impl From<VisibleCell> for char {
    fn from(value: VisibleCell) -> Self {
        match value {
            VisibleCell::Untouched => '.',
            VisibleCell::Flagged => '*',
            VisibleCell::RevealedEmpty => '/',
            VisibleCell::Revealed(adjacent) => (b'0' + adjacent) as char,
        }
    }
}

/// The playing field: a hidden array holding mines and adjacency counts, and
/// a parallel visible array holding flags and revealed cells. Both are
/// row-major and share dimensions, so a coordinate valid in one is valid in
/// the other. All reads and writes are scoped to a single coordinate.
#[derive(Debug)]
pub struct Board {
    width: usize,
    height: usize,
    hidden: Vec<HiddenCell>,
    visible: Vec<VisibleCell>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            hidden: vec![HiddenCell::Clear(0); width * height],
            visible: vec![VisibleCell::Untouched; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.x + pos.y * self.width)
    }

    pub fn hidden_at(&self, pos: Pos) -> Option<HiddenCell> {
        self.index(pos).map(|i| self.hidden[i])
    }

    pub fn visible_at(&self, pos: Pos) -> Option<VisibleCell> {
        self.index(pos).map(|i| self.visible[i])
    }

    pub fn set_mine(&mut self, pos: Pos) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        self.hidden[i] = HiddenCell::Mine;
        Ok(())
    }

    /// Stores the adjacency count of a mine-free cell. Mines carry no count.
    pub fn set_adjacent_count(&mut self, pos: Pos, count: u8) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        match self.hidden[i] {
            HiddenCell::Mine => Err(GameError::InvalidState(pos)),
            HiddenCell::Clear(_) => {
                self.hidden[i] = HiddenCell::Clear(count);
                Ok(())
            }
        }
    }

    /// Cycles a cell between untouched and flagged. Revealed cells keep
    /// their state; toggling them is a silent no-op.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        match self.visible[i] {
            VisibleCell::Untouched => self.visible[i] = VisibleCell::Flagged,
            VisibleCell::Flagged => self.visible[i] = VisibleCell::Untouched,
            VisibleCell::Revealed(_) | VisibleCell::RevealedEmpty => {}
        }
        Ok(())
    }

    /// Marks a cell revealed with the given count, zero rendering as empty.
    /// Revealing twice is an error so the flood fill can use it as a stop
    /// condition; a flag on the cell is overwritten.
    pub fn reveal(&mut self, pos: Pos, count: u8) -> Result<(), GameError> {
        let i = self.index(pos).ok_or(GameError::OutOfBounds(pos))?;
        if self.visible[i].is_revealed() {
            return Err(GameError::AlreadyRevealed(pos));
        }
        self.visible[i] = if count == 0 {
            VisibleCell::RevealedEmpty
        } else {
            VisibleCell::Revealed(count)
        };
        Ok(())
    }

    /// Renders one row of the visible board, `width` characters wide.
    /// Hidden state never leaks through here; a mine shows as whatever its
    /// visible cell is, which is never a revealed state.
    pub fn render_row(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| {
                self.visible_at(Pos::new(x, y))
                    .map(char::from)
                    .unwrap_or(' ')
            })
            .collect()
    }
}
