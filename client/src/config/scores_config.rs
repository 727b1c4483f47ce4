use common::config::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ScoresConfig {
    pub persist: bool,
    pub location: String,
}

impl Validate for ScoresConfig {
    fn validate(&self) -> Result<(), String> {
        if self.location.trim().is_empty() {
            return Err("scores location must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            persist: true,
            location: "tictactoe_scores.yaml".to_string(),
        }
    }
}
