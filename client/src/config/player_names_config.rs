use common::config::Validate;
use common::games::tictactoe::MAX_NAME_LENGTH;
use serde::{Deserialize, Serialize};

/// Names last entered on the setup screen, offered as defaults next time.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct PlayerNamesConfig {
    #[serde(default)]
    pub name_x: String,
    #[serde(default)]
    pub name_o: String,
    #[serde(default)]
    pub solo: String,
}

impl Validate for PlayerNamesConfig {
    fn validate(&self) -> Result<(), String> {
        for name in [&self.name_x, &self.name_o, &self.solo] {
            if name.trim().chars().count() > MAX_NAME_LENGTH {
                return Err(format!(
                    "player names must be at most {} characters",
                    MAX_NAME_LENGTH
                ));
            }
        }
        Ok(())
    }
}
