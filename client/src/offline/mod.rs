mod tictactoe_runner;

pub use tictactoe_runner::{MatchExit, run_match};
