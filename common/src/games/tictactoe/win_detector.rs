use super::board::{Board, WIN_LINES};
use super::types::WinningLine;

pub fn check_win(board: &Board) -> Option<WinningLine> {
    WIN_LINES.iter().find_map(|line| line_winner(board, line))
}

/// Only inspects the lines through `index`. Gives the same answer as
/// [`check_win`] as long as the board had no winner before `index` was marked.
pub fn check_win_at(board: &Board, index: usize) -> Option<WinningLine> {
    board.get(index)?;
    WIN_LINES
        .iter()
        .filter(|line| line.contains(&index))
        .find_map(|line| line_winner(board, line))
}

fn line_winner(board: &Board, line: &[usize; 3]) -> Option<WinningLine> {
    let player = board.get(line[0])?;
    if line[1..].iter().all(|&index| board.get(index) == Some(player)) {
        Some(WinningLine::new(player, *line))
    } else {
        None
    }
}
