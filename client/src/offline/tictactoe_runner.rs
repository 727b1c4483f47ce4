use std::io::{self, Write};
use std::pin::Pin;

use common::games::tictactoe::{MatchController, MatchObserver, ReplyTicket, ScoreStore};
use common::{log, log_debug};
use tokio::io::{AsyncBufRead, Lines};
use tokio::time::Sleep;

use crate::state::{ClientCommand, HELP_TEXT, is_confirmation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchExit {
    ModeSelect,
    Quit,
}

struct PendingReply {
    ticket: ReplyTicket,
    sleep: Pin<Box<Sleep>>,
}

impl PendingReply {
    fn new(ticket: ReplyTicket) -> Self {
        Self {
            ticket,
            sleep: Box::pin(tokio::time::sleep(ticket.delay)),
        }
    }
}

// Borrows the pending sleep instead of taking it, so losing a select race
// does not lose the timer.
async fn reply_due(pending: &mut Option<PendingReply>) -> ReplyTicket {
    match pending {
        Some(reply) => {
            reply.sleep.as_mut().await;
            reply.ticket
        }
        None => std::future::pending().await,
    }
}

/// Drives one match from input lines until the player leaves it. The
/// computer's reply timer is never cancelled; a reply that fires after a
/// reset is dropped by the controller.
pub async fn run_match<S, O, R>(
    controller: &mut MatchController<S, O>,
    lines: &mut Lines<R>,
) -> io::Result<MatchExit>
where
    S: ScoreStore,
    O: MatchObserver,
    R: AsyncBufRead + Unpin,
{
    let mut pending: Option<PendingReply> = None;
    let mut confirming_reset = false;

    println!("Type h for help.");

    loop {
        tokio::select! {
            ticket = reply_due(&mut pending) => {
                pending = None;
                if !controller.on_reply_due(ticket) {
                    log_debug!("[runner] Reply #{} had no effect", ticket.id);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    log!("[runner] Input closed, leaving the match");
                    return Ok(MatchExit::Quit);
                };

                if confirming_reset {
                    confirming_reset = false;
                    if is_confirmation(&line) {
                        controller.reset_scores();
                    } else {
                        println!("Scores kept.");
                    }
                    continue;
                }

                match ClientCommand::parse(&line) {
                    Some(ClientCommand::PlaceMark(index)) => {
                        if let Some(ticket) = controller.submit_human_move(index) {
                            pending = Some(PendingReply::new(ticket));
                        }
                    }
                    Some(ClientCommand::RestartRound) => controller.reset_round(),
                    Some(ClientCommand::ResetScores) => {
                        print!("Reset all scores for this mode? [y/N] ");
                        let _ = io::stdout().flush();
                        confirming_reset = true;
                    }
                    Some(ClientCommand::ModeSelect) => return Ok(MatchExit::ModeSelect),
                    Some(ClientCommand::Quit) => return Ok(MatchExit::Quit),
                    Some(ClientCommand::Help) => println!("{}", HELP_TEXT),
                    None => println!("Unknown command '{}'. Type h for help.", line.trim()),
                }
            }
        }
    }
}
