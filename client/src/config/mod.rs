mod config;
mod player_names_config;
mod scores_config;

pub use config::{get_config_manager, load_config, Config, LoadedConfig};
pub use player_names_config::PlayerNamesConfig;
pub use scores_config::ScoresConfig;
