use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::games::SessionRng;
use super::bot_controller::Difficulty;
use super::types::Player;

pub const MAX_NAME_LENGTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "hvh")]
    HumanVsHuman,
    #[serde(rename = "hva")]
    HumanVsComputer,
}

impl GameMode {
    /// Storage key; tallies of different modes never share a key.
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::HumanVsHuman => "hvh",
            GameMode::HumanVsComputer => "hva",
        }
    }

    pub fn is_computer(&self, player: Player) -> bool {
        *self == GameMode::HumanVsComputer && player == Player::O
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hvh" | "human-vs-human" | "pvp" => Ok(GameMode::HumanVsHuman),
            "hva" | "human-vs-computer" | "ai" => Ok(GameMode::HumanVsComputer),
            other => Err(format!("Unknown mode '{}', expected hvh or hva", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub name_x: String,
    pub name_o: String,
}

impl MatchSettings {
    /// Blank names fall back to `Player X`/`Player O`, or `Player`/`Computer`
    /// against the computer. The computer is always called `Computer`.
    pub fn new(mode: GameMode, difficulty: Difficulty, name_x: &str, name_o: &str) -> Self {
        let (default_x, default_o) = match mode {
            GameMode::HumanVsHuman => ("Player X", "Player O"),
            GameMode::HumanVsComputer => ("Player", "Computer"),
        };
        let name_o = match mode {
            GameMode::HumanVsHuman => name_or_default(name_o, default_o),
            GameMode::HumanVsComputer => default_o.to_string(),
        };

        Self {
            mode,
            difficulty,
            name_x: name_or_default(name_x, default_x),
            name_o,
        }
    }

    pub fn human_vs_human(name_x: &str, name_o: &str) -> Self {
        Self::new(GameMode::HumanVsHuman, Difficulty::default(), name_x, name_o)
    }

    pub fn human_vs_computer(name: &str, difficulty: Difficulty) -> Self {
        Self::new(GameMode::HumanVsComputer, difficulty, name, "")
    }

    pub fn name(&self, player: Player) -> &str {
        match player {
            Player::X => &self.name_x,
            Player::O => &self.name_o,
        }
    }
}

fn name_or_default(name: &str, default: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Validate for MatchSettings {
    fn validate(&self) -> Result<(), String> {
        for name in [&self.name_x, &self.name_o] {
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(format!(
                    "Player name '{}' is longer than {} characters",
                    name, MAX_NAME_LENGTH
                ));
            }
        }
        Ok(())
    }
}

/// Bounds of the computer's artificial thinking pause, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinkingWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for ThinkingWindow {
    fn default() -> Self {
        Self {
            min_ms: 500,
            max_ms: 1200,
        }
    }
}

impl ThinkingWindow {
    pub fn instant() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn draw(&self, rng: &mut SessionRng) -> Duration {
        rng.random_duration_between(
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

impl Validate for ThinkingWindow {
    fn validate(&self) -> Result<(), String> {
        if self.min_ms > self.max_ms {
            return Err(format!(
                "Thinking time min_ms ({}) cannot exceed max_ms ({})",
                self.min_ms, self.max_ms
            ));
        }
        Ok(())
    }
}
