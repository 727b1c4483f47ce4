mod board;
mod bot_controller;
mod events;
mod game_state;
mod score;
mod session;
mod settings;
mod types;
mod win_detector;

pub use board::{Board, WIN_LINES};
pub use bot_controller::{
    BotError, BotInput, Difficulty, calculate_minimax_move, calculate_move, find_threat,
};
pub use events::{MatchEvent, MatchObserver, ModalKind, SoundCue};
pub use game_state::{PlaceOutcome, TicTacToeGameState};
pub use score::{FileScoreStore, MemoryScoreStore, ScoreStore, ScoreTally};
pub use session::{MatchController, MatchPhase, ReplyTicket, THINKING_STATUS};
pub use settings::{GameMode, MAX_NAME_LENGTH, MatchSettings, ThinkingWindow};
pub use types::{
    BOARD_SIZE, CENTER, CORNERS, GameStatus, MoveError, Player, RoundOutcome, WinningLine,
};
pub use win_detector::{check_win, check_win_at};
