use common::games::tictactoe::{BOARD_SIZE, GameMode};

pub const HELP_TEXT: &str = "\
Keys:
  1-9  place a mark (1 2 3 / 4 5 6 / 7 8 9)
  r    restart the round
  s    reset the scores
  m    back to mode selection
  q    quit
  h    show this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    PlaceMark(usize),
    RestartRound,
    ResetScores,
    ModeSelect,
    Quit,
    Help,
}

impl ClientCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(key) = line.parse::<usize>() {
            return (1..=BOARD_SIZE)
                .contains(&key)
                .then(|| ClientCommand::PlaceMark(key - 1));
        }

        match line.to_ascii_lowercase().as_str() {
            "r" | "restart" => Some(ClientCommand::RestartRound),
            "s" | "scores" => Some(ClientCommand::ResetScores),
            "m" | "menu" => Some(ClientCommand::ModeSelect),
            "q" | "quit" | "exit" => Some(ClientCommand::Quit),
            "h" | "help" | "?" => Some(ClientCommand::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start(GameMode),
    Quit,
}

impl MenuCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "1" => Some(MenuCommand::Start(GameMode::HumanVsHuman)),
            "2" => Some(MenuCommand::Start(GameMode::HumanVsComputer)),
            "q" | "quit" | "exit" => Some(MenuCommand::Quit),
            other => other.parse::<GameMode>().ok().map(MenuCommand::Start),
        }
    }
}

/// Answer to the `y/N` confirmation; anything but yes declines.
pub fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
