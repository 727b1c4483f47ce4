use std::fmt;
use std::str::FromStr;

use super::types::{BOARD_SIZE, MoveError, Player};

/// Rows, then columns, then the two diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Nine cells in row-major order. A marked cell is never changed again;
/// only a fresh board clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Player>; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Player>; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Player>; BOARD_SIZE] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    pub fn place(&mut self, index: usize, player: Player) -> Result<(), MoveError> {
        match self.cells.get_mut(index) {
            None => Err(MoveError::OutOfBounds(index)),
            Some(Some(_)) => Err(MoveError::CellOccupied(index)),
            Some(cell) => {
                *cell = Some(player);
                Ok(())
            }
        }
    }

    // Scratch marks used by the search; every `mark` is paired with a `clear`.
    pub(crate) fn mark(&mut self, index: usize, player: Player) {
        self.cells[index] = Some(player);
    }

    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(player)).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                let symbol = cell.map_or('.', Player::symbol);
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

/// Parses `X`, `O` and `.`/`_`/`-` cells; whitespace and `|` are ignored,
/// so both `"XX......."` and a 3-line grid work.
impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; BOARD_SIZE];
        let mut count = 0;
        for ch in s.chars().filter(|ch| !ch.is_whitespace() && *ch != '|') {
            if count >= BOARD_SIZE {
                return Err(format!("Board has more than {} cells", BOARD_SIZE));
            }
            cells[count] = match ch {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' | '_' | '-' => None,
                other => return Err(format!("Unexpected board character '{}'", other)),
            };
            count += 1;
        }
        if count != BOARD_SIZE {
            return Err(format!("Board needs {} cells, got {}", BOARD_SIZE, count));
        }
        Ok(Self { cells })
    }
}
