use std::path::{Path, PathBuf};

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::tictactoe::{Difficulty, GameMode, ThinkingWindow};
use common::log;
use serde::{Deserialize, Serialize};

use super::{PlayerNamesConfig, ScoresConfig};

const CONFIG_FILE_NAME: &str = "tictactoe_client_config.yaml";

fn exe_dir_path(file_name: &str) -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(file_name);
    }
    PathBuf::from(file_name)
}

pub fn get_config_manager(
    path_override: Option<&Path>,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    match path_override {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(exe_dir_path(CONFIG_FILE_NAME)),
    }
}

/// Every section may be left out of the file; missing ones take defaults.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub thinking: ThinkingWindow,
    pub difficulty: Difficulty,
    pub last_mode: Option<GameMode>,
    pub names: PlayerNamesConfig,
    pub scores: ScoresConfig,
    pub sound: bool,
}

/// Result of reading the config at startup. `writable` is false when the
/// file exists but could not be used, so it must not be overwritten.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub writable: bool,
}

pub fn load_config(
    manager: &ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer>,
) -> LoadedConfig {
    match manager.get_config() {
        Ok(config) => LoadedConfig {
            config,
            writable: true,
        },
        Err(e) => {
            log!("Failed to load config, using defaults without saving: {}", e);
            LoadedConfig {
                config: Config::default(),
                writable: false,
            }
        }
    }
}

impl Config {
    /// Score file path; relative locations live next to the executable.
    pub fn scores_path(&self) -> PathBuf {
        let location = Path::new(&self.scores.location);
        if location.is_absolute() {
            location.to_path_buf()
        } else {
            exe_dir_path(&self.scores.location)
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.thinking.validate()?;
        self.names.validate()?;
        self.scores.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thinking: ThinkingWindow::default(),
            difficulty: Difficulty::default(),
            last_mode: None,
            names: PlayerNamesConfig::default(),
            scores: ScoresConfig::default(),
            sound: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigSerializer, YamlConfigSerializer};

    fn get_temp_file_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_tictactoe_client_config_{}.yaml", random_number));
        path
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_file() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let content_provider = FileContentConfigProvider::new(get_temp_file_path());

        let serialized_string = serializer.serialize(&default_config).unwrap();
        assert!(content_provider.set_config_content(&serialized_string).is_ok());

        let read_string = content_provider.get_config_content().unwrap().unwrap();
        let deserialized_config: Config = serializer.deserialize(&read_string).unwrap();
        assert_eq!(default_config, deserialized_config);

        let _ = std::fs::remove_file(content_provider.path());
    }

    #[test]
    fn test_config_manager_round_trips_last_match() {
        let config = Config {
            difficulty: Difficulty::Medium,
            last_mode: Some(GameMode::HumanVsComputer),
            names: PlayerNamesConfig {
                solo: "Ada".to_string(),
                ..PlayerNamesConfig::default()
            },
            ..Config::default()
        };
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(file_path.as_path()));

        assert!(manager.set_config(&config).is_ok());
        assert_eq!(manager.get_config().unwrap(), config);

        let reopened = get_config_manager(Some(file_path.as_path()));
        assert_eq!(reopened.get_config().unwrap(), config);

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager(Some(Path::new("this_file_does_not_exist.yaml")));
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_missing_sound_and_names_use_defaults() {
        let content = r#"
            thinking:
              min_ms: 100
              max_ms: 200
            difficulty: easy
            last_mode: hvh
            scores:
              persist: false
              location: scores.yaml
        "#;
        let serializer = YamlConfigSerializer::new();
        let config: Config = serializer.deserialize(content).unwrap();
        assert!(config.sound);
        assert_eq!(config.names, PlayerNamesConfig::default());
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.last_mode, Some(GameMode::HumanVsHuman));
        assert!(!config.scores.persist);
    }

    #[test]
    fn test_partial_config_keeps_given_values() {
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);
        content_provider
            .set_config_content("sound: false\nthinking:\n  max_ms: 800\n")
            .unwrap();

        let manager = get_config_manager(Some(file_path.as_path()));
        let loaded = load_config(&manager);

        assert!(loaded.writable);
        assert!(!loaded.config.sound);
        assert_eq!(
            loaded.config.thinking,
            ThinkingWindow {
                min_ms: 500,
                max_ms: 800
            }
        );
        assert_eq!(loaded.config.scores, ScoresConfig::default());
        assert_eq!(loaded.config.difficulty, Difficulty::default());

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_unusable_config_is_not_overwritten() {
        let content = "thinking:\n  min_ms: 1500\n  max_ms: 500\nsound: false\n";
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);
        content_provider.set_config_content(content).unwrap();

        let manager = get_config_manager(Some(file_path.as_path()));
        let loaded = load_config(&manager);

        assert!(!loaded.writable);
        assert_eq!(loaded.config, Config::default());
        assert_eq!(
            content_provider.get_config_content().unwrap().as_deref(),
            Some(content)
        );

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_missing_config_file_is_writable() {
        let file_path = get_temp_file_path();
        let loaded = load_config(&get_config_manager(Some(file_path.as_path())));
        assert!(loaded.writable);
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            thinking:
              min_ms: 1500
              max_ms: 500
            difficulty: hard
            scores:
              persist: true
              location: scores.yaml
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(&file_path);
        content_provider
            .set_config_content(invalid_config_content)
            .unwrap();

        let manager: ConfigManager<_, Config, _> =
            ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(manager.get_config().is_err());

        let _ = std::fs::remove_file(&file_path);
    }

    #[test]
    fn test_blank_scores_location_is_rejected() {
        let config = Config {
            scores: ScoresConfig {
                persist: true,
                location: "  ".to_string(),
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
