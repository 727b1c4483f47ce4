use std::io::{self, Write};
use std::thread;

use common::games::tictactoe::{
    Board, GameMode, MatchEvent, MatchObserver, MatchSettings, Player, RoundOutcome, ScoreTally,
    SoundCue, WinningLine,
};
use common::log_debug;

pub fn mode_badge(settings: &MatchSettings) -> String {
    match settings.mode {
        GameMode::HumanVsHuman => "HvH".to_string(),
        GameMode::HumanVsComputer => {
            format!("AI·{}", settings.difficulty.as_str().to_ascii_uppercase())
        }
    }
}

pub fn score_line(settings: &MatchSettings, tally: &ScoreTally) -> String {
    match settings.mode {
        GameMode::HumanVsHuman => format!(
            "{} Wins: {}  |  {} Wins: {}  |  Draws: {}",
            settings.name_x, tally.x, settings.name_o, tally.o, tally.draws
        ),
        GameMode::HumanVsComputer => format!(
            "Your Wins: {}  |  AI Wins: {}  |  Draws: {}",
            tally.x, tally.o, tally.draws
        ),
    }
}

/// Draws the grid. Empty cells show the key that plays them; cells of the
/// winning line are bracketed.
pub fn render_board(board: &Board, line: Option<&WinningLine>) -> String {
    let mut rows = Vec::with_capacity(3);
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                let symbol = match board.get(index) {
                    Some(player) => player.symbol().to_string(),
                    None => (index + 1).to_string(),
                };
                if line.is_some_and(|line| line.contains(index)) {
                    format!("[{}]", symbol)
                } else {
                    format!(" {} ", symbol)
                }
            })
            .collect();
        rows.push(cells.join("|"));
    }
    rows.join("\n---+---+---\n")
}

pub fn announcement(outcome: RoundOutcome, winner_name: Option<&str>) -> String {
    match (outcome, winner_name) {
        (RoundOutcome::Win(_), Some(name)) => format!("{} wins!", name),
        (RoundOutcome::Win(player), None) => format!("{} wins!", player),
        (RoundOutcome::Draw, _) => "It's a draw!".to_string(),
    }
}

#[derive(Default)]
pub struct TerminalPresenter {
    settings: Option<MatchSettings>,
    board: Board,
    tally: ScoreTally,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_scores(&self) {
        if let Some(settings) = &self.settings {
            println!("{}", score_line(settings, &self.tally));
        }
    }
}

impl MatchObserver for TerminalPresenter {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::MatchStarted { settings, tally } => {
                println!();
                println!(
                    "=== {} (X) vs {} (O)  [{}] ===",
                    settings.name_x,
                    settings.name_o,
                    mode_badge(settings)
                );
                self.settings = Some(settings.clone());
                self.tally = *tally;
            }
            MatchEvent::BoardChanged { board, .. } => {
                self.board = *board;
            }
            MatchEvent::StatusChanged(status) => {
                println!();
                println!("{}", render_board(&self.board, None));
                println!();
                self.print_scores();
                println!("{}", status);
            }
            MatchEvent::MovePlayed {
                index,
                player,
                by_computer: true,
            } => {
                println!("Computer ({}) takes cell {}", player, index + 1);
            }
            MatchEvent::ScoresChanged(tally) => {
                self.tally = *tally;
            }
            MatchEvent::RoundOver {
                outcome,
                line,
                winner_name,
                modal,
                ..
            } => {
                println!();
                println!("{}", render_board(&self.board, line.as_ref()));
                println!();
                let _ = io::stdout().flush();
                // Leave the highlighted line on screen before announcing.
                thread::sleep(modal.delay());
                println!("{}", announcement(*outcome, winner_name.as_deref()));
                self.print_scores();
                println!("Press r to play again, m for the menu, q to quit.");
            }
            MatchEvent::ActivePlayerChanged { .. }
            | MatchEvent::ThinkingStarted
            | MatchEvent::ThinkingStopped
            | MatchEvent::MovePlayed { .. } => {}
        }
    }
}

/// The end-of-round cues ring the terminal bell.
pub fn rings_bell(cue: SoundCue) -> bool {
    matches!(cue, SoundCue::Win | SoundCue::Lose | SoundCue::Draw)
}

pub struct TerminalAudio {
    enabled: bool,
}

impl TerminalAudio {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn bell_for(&self, event: &MatchEvent) -> bool {
        self.enabled && event.sound_cue().is_some_and(rings_bell)
    }
}

impl MatchObserver for TerminalAudio {
    fn on_event(&mut self, event: &MatchEvent) {
        if let Some(cue) = event.sound_cue() {
            log_debug!("[audio] {:?}", cue);
        }

        if self.bell_for(event) {
            print!("\x07");
            let _ = io::stdout().flush();
        }
    }
}
