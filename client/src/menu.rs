use std::io::{self, Write};

use common::config::Validate;
use common::games::tictactoe::{Difficulty, GameMode, MatchSettings};
use tokio::io::{AsyncBufRead, Lines};

use crate::state::MenuCommand;

/// Values shown in brackets on the setup screen; an empty answer keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupDefaults {
    pub name_x: String,
    pub name_o: String,
    pub solo: String,
    pub difficulty: Difficulty,
}

/// Values fixed on the command line; their prompts are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SetupOverrides {
    pub name_x: Option<String>,
    pub name_o: Option<String>,
    pub difficulty: Option<Difficulty>,
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

async fn next_answer<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> io::Result<Option<String>> {
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

fn mode_key(mode: GameMode) -> &'static str {
    match mode {
        GameMode::HumanVsHuman => "1",
        GameMode::HumanVsComputer => "2",
    }
}

/// Returns `None` when the player quits or input ends. An empty answer
/// picks `last_mode` again, when there is one.
pub async fn select_mode<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    last_mode: Option<GameMode>,
) -> io::Result<Option<GameMode>> {
    println!();
    println!("=== Tic-Tac-Toe ===");
    println!("  1) Human vs Human");
    println!("  2) Human vs Computer");
    println!("  q) Quit");

    let prompt_text = match last_mode {
        Some(mode) => format!("[{}] > ", mode_key(mode)),
        None => "> ".to_string(),
    };

    loop {
        prompt(&prompt_text);
        let Some(answer) = next_answer(lines).await? else {
            return Ok(None);
        };
        if answer.is_empty()
            && let Some(mode) = last_mode
        {
            return Ok(Some(mode));
        }
        match MenuCommand::parse(&answer) {
            Some(MenuCommand::Start(mode)) => return Ok(Some(mode)),
            Some(MenuCommand::Quit) => return Ok(None),
            None => println!("Choose 1, 2 or q."),
        }
    }
}

async fn ask_name<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    label: &str,
    default: &str,
) -> io::Result<Option<String>> {
    if default.is_empty() {
        prompt(&format!("{}: ", label));
    } else {
        prompt(&format!("{} [{}]: ", label, default));
    }
    Ok(next_answer(lines).await?.map(|answer| {
        if answer.is_empty() {
            default.to_string()
        } else {
            answer
        }
    }))
}

async fn ask_difficulty<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    default: Difficulty,
) -> io::Result<Option<Difficulty>> {
    loop {
        prompt(&format!("Difficulty (easy/medium/hard) [{}]: ", default));
        let Some(answer) = next_answer(lines).await? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(default));
        }
        match answer.parse() {
            Ok(difficulty) => return Ok(Some(difficulty)),
            Err(e) => println!("{}", e),
        }
    }
}

/// Asks for whatever the overrides leave open and builds the match
/// settings. Names that fail validation are asked for again.
pub async fn setup_match<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    mode: GameMode,
    defaults: &SetupDefaults,
    overrides: &SetupOverrides,
) -> io::Result<Option<MatchSettings>> {
    loop {
        let settings = match mode {
            GameMode::HumanVsHuman => {
                let name_x = match &overrides.name_x {
                    Some(name) => name.clone(),
                    None => match ask_name(lines, "Name for X", &defaults.name_x).await? {
                        Some(name) => name,
                        None => return Ok(None),
                    },
                };
                let name_o = match &overrides.name_o {
                    Some(name) => name.clone(),
                    None => match ask_name(lines, "Name for O", &defaults.name_o).await? {
                        Some(name) => name,
                        None => return Ok(None),
                    },
                };
                MatchSettings::human_vs_human(&name_x, &name_o)
            }
            GameMode::HumanVsComputer => {
                let name = match &overrides.name_x {
                    Some(name) => name.clone(),
                    None => match ask_name(lines, "Your name", &defaults.solo).await? {
                        Some(name) => name,
                        None => return Ok(None),
                    },
                };
                let difficulty = match overrides.difficulty {
                    Some(difficulty) => difficulty,
                    None => match ask_difficulty(lines, defaults.difficulty).await? {
                        Some(difficulty) => difficulty,
                        None => return Ok(None),
                    },
                };
                MatchSettings::human_vs_computer(&name, difficulty)
            }
        };

        match settings.validate() {
            Ok(()) => return Ok(Some(settings)),
            Err(e) if overrides.name_x.is_some() || overrides.name_o.is_some() => {
                return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
            }
            Err(e) => println!("{}", e),
        }
    }
}
