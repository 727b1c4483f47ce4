use std::time::Duration;

use super::board::Board;
use super::score::ScoreTally;
use super::settings::MatchSettings;
use super::types::{Player, RoundOutcome, WinningLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    WinX,
    WinO,
    Draw,
}

impl ModalKind {
    pub fn for_outcome(outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::Win(Player::X) => ModalKind::WinX,
            RoundOutcome::Win(Player::O) => ModalKind::WinO,
            RoundOutcome::Draw => ModalKind::Draw,
        }
    }

    /// Pause before the announcement is shown, leaving time for the
    /// win-line highlight.
    pub fn delay(&self) -> Duration {
        match self {
            ModalKind::WinX | ModalKind::WinO => Duration::from_millis(750),
            ModalKind::Draw => Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    ComputerMove,
    Win,
    Lose,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    MatchStarted {
        settings: MatchSettings,
        tally: ScoreTally,
    },
    BoardChanged {
        board: Board,
        current: Player,
    },
    StatusChanged(String),
    ActivePlayerChanged {
        active: Option<Player>,
    },
    ThinkingStarted,
    ThinkingStopped,
    MovePlayed {
        index: usize,
        player: Player,
        by_computer: bool,
    },
    RoundOver {
        outcome: RoundOutcome,
        line: Option<WinningLine>,
        winner_name: Option<String>,
        computer_won: bool,
        modal: ModalKind,
    },
    ScoresChanged(ScoreTally),
}

impl MatchEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            MatchEvent::MovePlayed { by_computer: true, .. } => Some(SoundCue::ComputerMove),
            MatchEvent::MovePlayed { .. } => Some(SoundCue::Click),
            MatchEvent::RoundOver {
                outcome: RoundOutcome::Draw,
                ..
            } => Some(SoundCue::Draw),
            MatchEvent::RoundOver {
                computer_won: true, ..
            } => Some(SoundCue::Lose),
            MatchEvent::RoundOver { .. } => Some(SoundCue::Win),
            _ => None,
        }
    }
}

/// Receives every event the match controller produces. Presentation, audio
/// and anything else that reacts to the game implement this; none of them
/// can change the match.
pub trait MatchObserver {
    fn on_event(&mut self, event: &MatchEvent);
}

impl MatchObserver for () {
    fn on_event(&mut self, _event: &MatchEvent) {}
}

impl MatchObserver for Vec<MatchEvent> {
    fn on_event(&mut self, event: &MatchEvent) {
        self.push(event.clone());
    }
}

impl<A: MatchObserver, B: MatchObserver> MatchObserver for (A, B) {
    fn on_event(&mut self, event: &MatchEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}

impl<T: MatchObserver + ?Sized> MatchObserver for Box<T> {
    fn on_event(&mut self, event: &MatchEvent) {
        (**self).on_event(event);
    }
}
