use super::board::Board;
use super::types::{GameStatus, MoveError, Player, WinningLine};
use super::win_detector::check_win_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Continue { next: Player },
    Won(WinningLine),
    Draw,
}

/// One round: the board, whose turn it is and whether the round has ended.
#[derive(Debug, Clone)]
pub struct TicTacToeGameState {
    pub board: Board,
    pub current_player: Player,
    pub status: GameStatus,
    pub last_move: Option<usize>,
}

impl Default for TicTacToeGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeGameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::InProgress,
            last_move: None,
        }
    }

    pub fn place_mark(&mut self, player: Player, index: usize) -> Result<PlaceOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        if player != self.current_player {
            return Err(MoveError::NotYourTurn(player));
        }

        self.board.place(index, player)?;
        self.last_move = Some(index);

        if let Some(line) = check_win_at(&self.board, index) {
            self.status = GameStatus::Won(line);
            return Ok(PlaceOutcome::Won(line));
        }

        if self.board.is_full() {
            self.status = GameStatus::Draw;
            return Ok(PlaceOutcome::Draw);
        }

        self.current_player = player.opponent();
        Ok(PlaceOutcome::Continue {
            next: self.current_player,
        })
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.status {
            GameStatus::Won(line) => Some(line),
            _ => None,
        }
    }
}
