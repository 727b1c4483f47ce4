use std::time::Duration;

use crate::games::SessionRng;
use crate::{log, log_debug};
use super::board::Board;
use super::bot_controller::{BotInput, calculate_move};
use super::events::{MatchEvent, MatchObserver, ModalKind};
use super::game_state::{PlaceOutcome, TicTacToeGameState};
use super::score::{ScoreStore, ScoreTally};
use super::settings::{MatchSettings, ThinkingWindow};
use super::types::{Player, RoundOutcome, WinningLine};

pub const THINKING_STATUS: &str = "Computer is thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    AwaitingMove(Player),
    ComputerThinking,
    RoundOver(RoundOutcome),
}

/// A computer reply waiting for its thinking delay to elapse.
///
/// The host waits `delay` and hands the ticket back through
/// [`MatchController::on_reply_due`]. Tickets are never cancelled; one that
/// is no longer the pending ticket simply does nothing when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    pub id: u64,
    pub delay: Duration,
}

/// Owns the match: the round in play, the per-mode tally and the pending
/// computer reply. All changes go through its methods, and every change is
/// reported to the observer after the state has been updated.
pub struct MatchController<S: ScoreStore, O: MatchObserver> {
    settings: MatchSettings,
    thinking: ThinkingWindow,
    game_state: TicTacToeGameState,
    phase: MatchPhase,
    tally: ScoreTally,
    rng: SessionRng,
    issued_tickets: u64,
    pending_reply: Option<ReplyTicket>,
    store: S,
    observer: O,
}

impl<S: ScoreStore, O: MatchObserver> MatchController<S, O> {
    pub fn new(
        settings: MatchSettings,
        thinking: ThinkingWindow,
        rng: SessionRng,
        store: S,
        observer: O,
    ) -> Self {
        let mut controller = Self {
            settings: settings.clone(),
            thinking,
            game_state: TicTacToeGameState::new(),
            phase: MatchPhase::AwaitingMove(Player::X),
            tally: ScoreTally::default(),
            rng,
            issued_tickets: 0,
            pending_reply: None,
            store,
            observer,
        };
        controller.init_match(settings);
        controller
    }

    pub fn init_match(&mut self, settings: MatchSettings) {
        self.tally = self.store.load_score_tally(settings.mode);
        self.settings = settings;

        log!(
            "[match] Starting {} match: {} vs {} ({}), seed {}",
            self.settings.mode,
            self.settings.name_x,
            self.settings.name_o,
            self.settings.difficulty,
            self.rng.seed()
        );

        self.emit(MatchEvent::MatchStarted {
            settings: self.settings.clone(),
            tally: self.tally,
        });
        self.reset_round();
    }

    /// Plays `index` for the human whose turn it is. Occupied cells, a
    /// finished round and the computer's turn are ignored without any state
    /// change. Returns the computer's reply ticket when the move hands the
    /// turn to the computer.
    pub fn submit_human_move(&mut self, index: usize) -> Option<ReplyTicket> {
        let player = match self.phase {
            MatchPhase::AwaitingMove(player) if !self.settings.mode.is_computer(player) => player,
            phase => {
                log_debug!("[match] Ignoring cell {} while {:?}", index, phase);
                return None;
            }
        };

        if !self.game_state.board.is_empty_at(index) {
            log_debug!("[match] Ignoring cell {}: not an empty cell", index);
            return None;
        }

        self.apply_move(index, player, false)
    }

    /// Runs the computer's turn for `ticket`. Returns `false` and leaves the
    /// match untouched if the ticket is stale or the engine finds no move.
    pub fn on_reply_due(&mut self, ticket: ReplyTicket) -> bool {
        if self.pending_reply != Some(ticket) || self.phase != MatchPhase::ComputerThinking {
            log_debug!("[match] Dropping stale computer reply #{}", ticket.id);
            return false;
        }

        let input = BotInput::from_game_state(&self.game_state);
        // A full board ends the round before the computer is ever asked to move.
        debug_assert!(
            !input.board.is_full(),
            "computer asked to move on a full board"
        );
        let index = match calculate_move(self.settings.difficulty, &input, &mut self.rng) {
            Ok(index) => index,
            Err(e) => {
                log!("[match] Computer could not move: {}", e);
                return false;
            }
        };

        self.pending_reply = None;
        self.emit(MatchEvent::ThinkingStopped);

        log_debug!(
            "[match] Computer ({}) plays {} after {:?}",
            self.settings.difficulty,
            index,
            ticket.delay
        );
        self.apply_move(index, input.bot_player, true);
        true
    }

    pub fn reset_round(&mut self) {
        self.game_state = TicTacToeGameState::new();
        self.phase = MatchPhase::AwaitingMove(Player::X);

        if self.pending_reply.take().is_some() {
            log_debug!("[match] Round reset while the computer was thinking");
            self.emit(MatchEvent::ThinkingStopped);
        }

        self.emit(MatchEvent::BoardChanged {
            board: self.game_state.board,
            current: Player::X,
        });
        self.emit(MatchEvent::ActivePlayerChanged {
            active: Some(Player::X),
        });
        self.emit(MatchEvent::StatusChanged(self.turn_status(Player::X)));
    }

    pub fn reset_scores(&mut self) {
        self.tally = ScoreTally::default();
        self.store.clear_score_tally(self.settings.mode);
        log!("[match] Scores reset for {}", self.settings.mode);

        self.emit(MatchEvent::ScoresChanged(self.tally));
        self.reset_round();
    }

    fn apply_move(
        &mut self,
        index: usize,
        player: Player,
        by_computer: bool,
    ) -> Option<ReplyTicket> {
        let outcome = match self.game_state.place_mark(player, index) {
            Ok(outcome) => outcome,
            Err(e) => {
                log_debug!("[match] Move {} by {} rejected: {}", index, player, e);
                return None;
            }
        };

        self.emit(MatchEvent::MovePlayed {
            index,
            player,
            by_computer,
        });
        self.emit(MatchEvent::BoardChanged {
            board: self.game_state.board,
            current: self.game_state.current_player,
        });

        match outcome {
            PlaceOutcome::Won(line) => {
                self.finish_round(RoundOutcome::Win(line.player), Some(line));
                None
            }
            PlaceOutcome::Draw => {
                self.finish_round(RoundOutcome::Draw, None);
                None
            }
            PlaceOutcome::Continue { next } => {
                self.emit(MatchEvent::ActivePlayerChanged { active: Some(next) });
                if self.settings.mode.is_computer(next) {
                    Some(self.start_thinking())
                } else {
                    self.phase = MatchPhase::AwaitingMove(next);
                    self.emit(MatchEvent::StatusChanged(self.turn_status(next)));
                    None
                }
            }
        }
    }

    fn start_thinking(&mut self) -> ReplyTicket {
        self.issued_tickets += 1;
        let ticket = ReplyTicket {
            id: self.issued_tickets,
            delay: self.thinking.draw(&mut self.rng),
        };

        self.phase = MatchPhase::ComputerThinking;
        self.pending_reply = Some(ticket);

        self.emit(MatchEvent::ThinkingStarted);
        self.emit(MatchEvent::StatusChanged(THINKING_STATUS.to_string()));
        ticket
    }

    fn finish_round(&mut self, outcome: RoundOutcome, line: Option<WinningLine>) {
        self.phase = MatchPhase::RoundOver(outcome);
        self.pending_reply = None;

        self.tally.record(outcome);
        self.store.save_score_tally(self.settings.mode, &self.tally);

        let (winner_name, computer_won) = match outcome {
            RoundOutcome::Win(player) => (
                Some(self.settings.name(player).to_string()),
                self.settings.mode.is_computer(player),
            ),
            RoundOutcome::Draw => (None, false),
        };

        match winner_name {
            Some(ref name) => log!("[match] {} wins the round", name),
            None => log!("[match] Round ends in a draw"),
        }

        self.emit(MatchEvent::ActivePlayerChanged { active: None });
        self.emit(MatchEvent::ScoresChanged(self.tally));
        self.emit(MatchEvent::RoundOver {
            outcome,
            line,
            winner_name,
            computer_won,
            modal: ModalKind::for_outcome(outcome),
        });
    }

    fn turn_status(&self, player: Player) -> String {
        format!("{}'s turn", self.settings.name(player))
    }

    fn emit(&mut self, event: MatchEvent) {
        self.observer.on_event(&event);
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.game_state.board
    }

    pub fn current_player(&self) -> Player {
        self.game_state.current_player
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, MatchPhase::RoundOver(_))
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        self.game_state.winning_line()
    }

    pub fn tally(&self) -> ScoreTally {
        self.tally
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn player_name(&self, player: Player) -> &str {
        self.settings.name(player)
    }

    pub fn pending_reply(&self) -> Option<ReplyTicket> {
        self.pending_reply
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ends the match, handing back the score store so the next match can
    /// reuse it.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::bot_controller::Difficulty;
    use crate::games::tictactoe::events::SoundCue;
    use crate::games::tictactoe::score::MemoryScoreStore;
    use crate::games::tictactoe::settings::GameMode;

    type TestController = MatchController<MemoryScoreStore, Vec<MatchEvent>>;

    fn controller(settings: MatchSettings, store: MemoryScoreStore) -> TestController {
        MatchController::new(
            settings,
            ThinkingWindow::default(),
            SessionRng::new(42),
            store,
            Vec::new(),
        )
    }

    fn human_vs_human() -> TestController {
        controller(MatchSettings::human_vs_human("Alice", "Bob"), MemoryScoreStore::new())
    }

    fn human_vs_computer(difficulty: Difficulty) -> TestController {
        controller(
            MatchSettings::human_vs_computer("Ada", difficulty),
            MemoryScoreStore::new(),
        )
    }

    fn play_all(controller: &mut TestController, moves: &[usize]) {
        for &index in moves {
            assert_eq!(controller.submit_human_move(index), None);
        }
    }

    #[test]
    fn test_new_match_awaits_x_with_loaded_tally() {
        let stored = ScoreTally { x: 2, o: 1, draws: 3 };
        let store = MemoryScoreStore::new().with_tally(GameMode::HumanVsHuman, stored);
        let controller = controller(MatchSettings::human_vs_human("Alice", "Bob"), store);

        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
        assert_eq!(controller.tally(), stored);
        assert_eq!(controller.board(), &Board::new());
        assert!(matches!(
            controller.observer().first(),
            Some(MatchEvent::MatchStarted { tally, .. }) if *tally == stored
        ));
        assert_eq!(
            controller.observer().last(),
            Some(&MatchEvent::StatusChanged("Alice's turn".to_string()))
        );
    }

    #[test]
    fn test_turns_alternate_between_humans() {
        let mut controller = human_vs_human();
        controller.submit_human_move(4);
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::O));
        assert_eq!(controller.board().get(4), Some(Player::X));

        controller.submit_human_move(0);
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
        assert_eq!(controller.board().get(0), Some(Player::O));
        assert_eq!(
            controller.observer().last(),
            Some(&MatchEvent::StatusChanged("Alice's turn".to_string()))
        );
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut controller = human_vs_human();
        controller.submit_human_move(4);
        let events_before = controller.observer().len();

        controller.submit_human_move(4);
        assert_eq!(controller.board().count(Player::O), 0);
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::O));
        assert_eq!(controller.observer().len(), events_before);

        controller.submit_human_move(42);
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::O));
    }

    #[test]
    fn test_column_win_records_and_persists_score() {
        let mut controller = human_vs_human();
        play_all(&mut controller, &[0, 1, 3, 4, 6]);

        assert_eq!(controller.phase(), MatchPhase::RoundOver(RoundOutcome::Win(Player::X)));
        assert!(controller.is_game_over());
        assert_eq!(controller.winning_line().map(|line| line.cells), Some([0, 3, 6]));
        assert_eq!(controller.tally(), ScoreTally { x: 1, o: 0, draws: 0 });
        assert_eq!(controller.store().load_score_tally(GameMode::HumanVsHuman).x, 1);

        let round_over = controller.observer().last().unwrap();
        assert_eq!(
            round_over,
            &MatchEvent::RoundOver {
                outcome: RoundOutcome::Win(Player::X),
                line: Some(WinningLine::new(Player::X, [0, 3, 6])),
                winner_name: Some("Alice".to_string()),
                computer_won: false,
                modal: ModalKind::WinX,
            }
        );
        assert_eq!(round_over.sound_cue(), Some(SoundCue::Win));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut controller = human_vs_human();
        play_all(&mut controller, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(controller.phase(), MatchPhase::RoundOver(RoundOutcome::Draw));
        assert_eq!(controller.tally(), ScoreTally { x: 0, o: 0, draws: 1 });
        assert_eq!(controller.store().load_score_tally(GameMode::HumanVsHuman).draws, 1);
    }

    #[test]
    fn test_moves_after_round_over_are_ignored() {
        let mut controller = human_vs_human();
        play_all(&mut controller, &[0, 1, 3, 4, 6]);
        let board = *controller.board();

        controller.submit_human_move(8);
        assert_eq!(controller.board(), &board);
        assert_eq!(controller.tally().x, 1);
    }

    #[test]
    fn test_reset_round_keeps_tally() {
        let mut controller = human_vs_human();
        play_all(&mut controller, &[0, 1, 3, 4, 6]);

        controller.reset_round();
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.current_player(), Player::X);
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
        assert!(!controller.is_game_over());
        assert_eq!(controller.tally().x, 1);
    }

    #[test]
    fn test_reset_scores_clears_tally_and_board() {
        let mut controller = human_vs_human();
        play_all(&mut controller, &[0, 1, 3, 4, 6]);
        controller.reset_round();
        controller.submit_human_move(4);

        controller.reset_scores();
        assert!(controller.tally().is_zero());
        assert!(!controller.store().contains(GameMode::HumanVsHuman));
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
        assert!(
            controller
                .observer()
                .contains(&MatchEvent::ScoresChanged(ScoreTally::default()))
        );
    }

    #[test]
    fn test_modes_keep_separate_tallies() {
        let store = MemoryScoreStore::new()
            .with_tally(GameMode::HumanVsComputer, ScoreTally { x: 0, o: 7, draws: 2 });
        let mut controller = controller(MatchSettings::human_vs_human("Alice", "Bob"), store);
        play_all(&mut controller, &[0, 1, 3, 4, 6]);

        controller.init_match(MatchSettings::human_vs_computer("Ada", Difficulty::Hard));
        assert_eq!(controller.tally(), ScoreTally { x: 0, o: 7, draws: 2 });
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));

        controller.reset_scores();
        let store = controller.into_store();
        assert!(store.load_score_tally(GameMode::HumanVsComputer).is_zero());
        assert_eq!(store.load_score_tally(GameMode::HumanVsHuman).x, 1);
    }

    #[test]
    fn test_human_move_hands_turn_to_computer() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        let ticket = controller.submit_human_move(0).unwrap();

        assert_eq!(controller.phase(), MatchPhase::ComputerThinking);
        assert_eq!(controller.pending_reply(), Some(ticket));
        assert!(ticket.delay >= Duration::from_millis(500));
        assert!(ticket.delay <= Duration::from_millis(1200));
        assert_eq!(
            controller.observer().last(),
            Some(&MatchEvent::StatusChanged(THINKING_STATUS.to_string()))
        );

        assert!(controller.on_reply_due(ticket));
        assert_eq!(controller.board().get(4), Some(Player::O));
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
        assert_eq!(controller.pending_reply(), None);
        assert!(controller.observer().contains(&MatchEvent::MovePlayed {
            index: 4,
            player: Player::O,
            by_computer: true,
        }));
    }

    #[test]
    fn test_human_moves_rejected_while_computer_thinks() {
        let mut controller = human_vs_computer(Difficulty::Easy);
        let ticket = controller.submit_human_move(0).unwrap();
        let board = *controller.board();

        assert_eq!(controller.submit_human_move(1), None);
        assert_eq!(controller.board(), &board);
        assert_eq!(controller.phase(), MatchPhase::ComputerThinking);
        assert!(controller.on_reply_due(ticket));
    }

    #[test]
    fn test_reply_after_reset_does_not_touch_board() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        let ticket = controller.submit_human_move(0).unwrap();

        controller.reset_round();
        assert!(!controller.on_reply_due(ticket));
        assert_eq!(controller.board(), &Board::new());
        assert_eq!(controller.phase(), MatchPhase::AwaitingMove(Player::X));
    }

    #[test]
    fn test_only_latest_ticket_fires() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        let stale = controller.submit_human_move(0).unwrap();
        controller.reset_round();
        let fresh = controller.submit_human_move(8).unwrap();

        assert_ne!(stale.id, fresh.id);
        assert!(!controller.on_reply_due(stale));
        assert_eq!(controller.board().count(Player::O), 0);
        assert!(controller.on_reply_due(fresh));
        assert_eq!(controller.board().count(Player::O), 1);
        assert!(!controller.on_reply_due(fresh));
    }

    #[test]
    fn test_reply_after_reset_scores_is_stale() {
        let mut controller = human_vs_computer(Difficulty::Medium);
        let ticket = controller.submit_human_move(4).unwrap();
        controller.reset_scores();
        assert!(!controller.on_reply_due(ticket));
        assert_eq!(controller.board(), &Board::new());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "computer asked to move on a full board")]
    fn test_reply_on_full_board_is_fatal_in_debug() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        let ticket = controller.submit_human_move(0).unwrap();
        controller.game_state.board = "XOX XOO OXX".parse().unwrap();

        controller.on_reply_due(ticket);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_reply_on_full_board_changes_nothing() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        let ticket = controller.submit_human_move(0).unwrap();
        controller.game_state.board = "XOX XOO OXX".parse().unwrap();
        let events_before = controller.observer().len();

        assert!(!controller.on_reply_due(ticket));
        assert_eq!(controller.pending_reply(), Some(ticket));
        assert_eq!(controller.phase(), MatchPhase::ComputerThinking);
        assert_eq!(controller.observer().len(), events_before);
    }

    #[test]
    fn test_hard_computer_beats_careless_human() {
        let mut controller = human_vs_computer(Difficulty::Hard);
        // The human always takes the lowest free cell.
        while !controller.is_game_over() {
            let index = controller.board().empty_cells()[0];
            if let Some(ticket) = controller.submit_human_move(index) {
                assert!(controller.on_reply_due(ticket));
            }
        }

        assert_eq!(controller.phase(), MatchPhase::RoundOver(RoundOutcome::Win(Player::O)));
        assert_eq!(controller.tally(), ScoreTally { x: 0, o: 1, draws: 0 });
        assert_eq!(
            controller.store().load_score_tally(GameMode::HumanVsComputer).o,
            1
        );

        let round_over = controller.observer().last().unwrap();
        assert!(matches!(
            round_over,
            MatchEvent::RoundOver {
                computer_won: true,
                winner_name: Some(name),
                ..
            } if name == "Computer"
        ));
        assert_eq!(round_over.sound_cue(), Some(SoundCue::Lose));
    }

    #[test]
    fn test_computer_never_loses_on_hard() {
        for seed in 0..10u64 {
            let mut controller = MatchController::new(
                MatchSettings::human_vs_computer("Ada", Difficulty::Hard),
                ThinkingWindow::instant(),
                SessionRng::new(seed),
                MemoryScoreStore::new(),
                (),
            );
            let mut human = SessionRng::new(seed + 100);
            while !controller.is_game_over() {
                let index = human.choose(&controller.board().empty_cells()).unwrap();
                if let Some(ticket) = controller.submit_human_move(index) {
                    assert_eq!(ticket.delay, Duration::ZERO);
                    controller.on_reply_due(ticket);
                }
            }
            assert_eq!(controller.tally().x, 0, "seed {}", seed);
        }
    }
}
