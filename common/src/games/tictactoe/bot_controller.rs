use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::games::SessionRng;
use super::board::{Board, WIN_LINES};
use super::game_state::TicTacToeGameState;
use super::types::{CENTER, CORNERS, Player};
use super::win_detector::check_win_at;

const WIN_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Unknown difficulty '{}', expected easy, medium or hard",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotError {
    NoLegalMove,
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoLegalMove => write!(f, "No empty cell left to play"),
        }
    }
}

impl std::error::Error for BotError {}

#[derive(Debug, Clone)]
pub struct BotInput {
    pub board: Board,
    pub bot_player: Player,
}

impl BotInput {
    pub fn new(board: Board, bot_player: Player) -> Self {
        Self { board, bot_player }
    }

    pub fn from_game_state(state: &TicTacToeGameState) -> Self {
        Self {
            board: state.board,
            bot_player: state.current_player,
        }
    }
}

/// Picks the cell `input.bot_player` should mark next.
///
/// Never called on a full board by the match controller; doing so yields
/// [`BotError::NoLegalMove`]. The caller's board is never modified.
pub fn calculate_move(
    difficulty: Difficulty,
    input: &BotInput,
    rng: &mut SessionRng,
) -> Result<usize, BotError> {
    let available_moves = input.board.empty_cells();
    if available_moves.is_empty() {
        return Err(BotError::NoLegalMove);
    }

    let chosen = match difficulty {
        Difficulty::Easy => calculate_random_move(&available_moves, rng),
        Difficulty::Medium => calculate_heuristic_move(input, &available_moves, rng),
        Difficulty::Hard => calculate_minimax_move(input),
    };

    chosen.ok_or(BotError::NoLegalMove)
}

fn calculate_random_move(available_moves: &[usize], rng: &mut SessionRng) -> Option<usize> {
    rng.choose(available_moves)
}

fn calculate_heuristic_move(
    input: &BotInput,
    available_moves: &[usize],
    rng: &mut SessionRng,
) -> Option<usize> {
    let board = &input.board;

    if let Some(index) = find_threat(board, input.bot_player) {
        return Some(index);
    }

    if let Some(index) = find_threat(board, input.bot_player.opponent()) {
        return Some(index);
    }

    if board.is_empty_at(CENTER) {
        return Some(CENTER);
    }

    let open_corners: Vec<usize> = CORNERS
        .into_iter()
        .filter(|&index| board.is_empty_at(index))
        .collect();
    if !open_corners.is_empty() {
        return rng.choose(&open_corners);
    }

    // Center and corners are taken, so only edges can be left here.
    calculate_random_move(available_moves, rng)
}

/// The empty cell that would complete a line already holding two of
/// `player`'s marks. Lines are tried in [`WIN_LINES`] order.
pub fn find_threat(board: &Board, player: Player) -> Option<usize> {
    WIN_LINES.iter().find_map(|line| {
        let owned = line
            .iter()
            .filter(|&&index| board.get(index) == Some(player))
            .count();
        if owned != 2 {
            return None;
        }
        line.iter().copied().find(|&index| board.is_empty_at(index))
    })
}

/// Full-depth minimax with alpha-beta pruning.
///
/// Wins score `10 - depth`, losses `depth - 10`, draws `0`. Ties go to the
/// lowest cell index, so the result is deterministic: an empty board yields
/// `0` and a lone corner opening is answered with the center.
pub fn calculate_minimax_move(input: &BotInput) -> Option<usize> {
    let bot_player = input.bot_player;
    let mut board = input.board;

    let mut best_move = None;
    let mut best_score = i32::MIN;
    let mut alpha = i32::MIN;

    for index in board.empty_cells() {
        board.mark(index, bot_player);
        let score = minimax(&mut board, index, 0, false, bot_player, alpha, i32::MAX);
        board.clear(index);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
        alpha = alpha.max(best_score);
    }

    best_move
}

fn minimax(
    board: &mut Board,
    last_move: usize,
    depth: i32,
    is_maximizing: bool,
    bot_player: Player,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    if let Some(line) = check_win_at(board, last_move) {
        return if line.player == bot_player {
            WIN_SCORE - depth
        } else {
            depth - WIN_SCORE
        };
    }

    let moves = board.empty_cells();
    if moves.is_empty() {
        return 0;
    }

    if is_maximizing {
        let mut max_eval = i32::MIN;
        for index in moves {
            board.mark(index, bot_player);
            let eval = minimax(board, index, depth + 1, false, bot_player, alpha, beta);
            board.clear(index);

            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let opponent = bot_player.opponent();
        let mut min_eval = i32::MAX;
        for index in moves {
            board.mark(index, opponent);
            let eval = minimax(board, index, depth + 1, true, bot_player, alpha, beta);
            board.clear(index);

            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}
