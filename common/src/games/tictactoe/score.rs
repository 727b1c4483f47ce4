use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{
    ConfigContentProvider, ConfigError, ConfigSerializer, FileContentConfigProvider,
    YamlConfigSerializer,
};
use crate::log;
use super::settings::GameMode;
use super::types::{Player, RoundOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreTally {
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub o: u32,
    #[serde(default)]
    pub draws: u32,
}

impl ScoreTally {
    pub fn record(&mut self, outcome: RoundOutcome) {
        let entry = match outcome {
            RoundOutcome::Win(Player::X) => &mut self.x,
            RoundOutcome::Win(Player::O) => &mut self.o,
            RoundOutcome::Draw => &mut self.draws,
        };
        *entry = entry.saturating_add(1);
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Where per-mode tallies live between sessions.
///
/// Never fails towards the caller: a tally that can't be read is a zeroed
/// tally, and writes are best effort.
pub trait ScoreStore {
    fn load_score_tally(&self, mode: GameMode) -> ScoreTally;
    fn save_score_tally(&mut self, mode: GameMode, tally: &ScoreTally);
    fn clear_score_tally(&mut self, mode: GameMode);
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load_score_tally(&self, mode: GameMode) -> ScoreTally {
        (**self).load_score_tally(mode)
    }

    fn save_score_tally(&mut self, mode: GameMode, tally: &ScoreTally) {
        (**self).save_score_tally(mode, tally)
    }

    fn clear_score_tally(&mut self, mode: GameMode) {
        (**self).clear_score_tally(mode)
    }
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    tallies: HashMap<GameMode, ScoreTally>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tally(mut self, mode: GameMode, tally: ScoreTally) -> Self {
        self.tallies.insert(mode, tally);
        self
    }

    pub fn contains(&self, mode: GameMode) -> bool {
        self.tallies.contains_key(&mode)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_score_tally(&self, mode: GameMode) -> ScoreTally {
        self.tallies.get(&mode).copied().unwrap_or_default()
    }

    fn save_score_tally(&mut self, mode: GameMode, tally: &ScoreTally) {
        self.tallies.insert(mode, *tally);
    }

    fn clear_score_tally(&mut self, mode: GameMode) {
        self.tallies.remove(&mode);
    }
}

type ScoreFile = BTreeMap<String, ScoreTally>;

/// YAML file with one tally per mode key, e.g.
///
/// ```yaml
/// hva:
///   x: 1
///   o: 4
///   draws: 2
/// ```
pub struct FileScoreStore<TContentProvider = FileContentConfigProvider>
where
    TContentProvider: ConfigContentProvider,
{
    content_provider: TContentProvider,
    serializer: YamlConfigSerializer,
}

impl FileScoreStore<FileContentConfigProvider> {
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path))
    }
}

impl<TContentProvider: ConfigContentProvider> FileScoreStore<TContentProvider> {
    pub fn new(content_provider: TContentProvider) -> Self {
        Self {
            content_provider,
            serializer: YamlConfigSerializer::new(),
        }
    }

    fn read_all(&self) -> Result<ScoreFile, ConfigError> {
        match self.content_provider.get_config_content()? {
            Some(content) => self.serializer.deserialize(&content),
            None => Ok(ScoreFile::new()),
        }
    }

    fn write_all(&self, scores: &ScoreFile) -> Result<(), ConfigError> {
        let content = self.serializer.serialize(scores)?;
        self.content_provider.set_config_content(&content)
    }

    // A corrupt file is replaced rather than blocking every later save.
    fn read_for_update(&self) -> ScoreFile {
        self.read_all().unwrap_or_else(|e| {
            log!("[scores] Discarding unreadable score file: {}", e);
            ScoreFile::new()
        })
    }
}

impl<TContentProvider: ConfigContentProvider> ScoreStore for FileScoreStore<TContentProvider> {
    fn load_score_tally(&self, mode: GameMode) -> ScoreTally {
        match self.read_all() {
            Ok(scores) => scores.get(mode.key()).copied().unwrap_or_default(),
            Err(e) => {
                log!("[scores] Failed to load {} scores: {}", mode, e);
                ScoreTally::default()
            }
        }
    }

    fn save_score_tally(&mut self, mode: GameMode, tally: &ScoreTally) {
        let mut scores = self.read_for_update();
        scores.insert(mode.key().to_string(), *tally);
        if let Err(e) = self.write_all(&scores) {
            log!("[scores] Failed to save {} scores: {}", mode, e);
        }
    }

    fn clear_score_tally(&mut self, mode: GameMode) {
        let mut scores = self.read_for_update();
        if scores.remove(mode.key()).is_none() {
            return;
        }
        if let Err(e) = self.write_all(&scores) {
            log!("[scores] Failed to clear {} scores: {}", mode, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_tictactoe_scores_{}.yaml", random_number))
    }

    #[test]
    fn test_record_increments_matching_entry() {
        let mut tally = ScoreTally::default();
        tally.record(RoundOutcome::Win(Player::X));
        tally.record(RoundOutcome::Win(Player::X));
        tally.record(RoundOutcome::Draw);
        assert_eq!(tally, ScoreTally { x: 2, o: 0, draws: 1 });
        assert!(!tally.is_zero());
    }

    #[test]
    fn test_memory_store_keeps_modes_apart() {
        let mut store = MemoryScoreStore::new();
        store.save_score_tally(GameMode::HumanVsHuman, &ScoreTally { x: 3, o: 1, draws: 0 });
        assert_eq!(store.load_score_tally(GameMode::HumanVsComputer), ScoreTally::default());
        assert_eq!(store.load_score_tally(GameMode::HumanVsHuman).x, 3);

        store.clear_score_tally(GameMode::HumanVsHuman);
        assert!(!store.contains(GameMode::HumanVsHuman));
        assert!(store.load_score_tally(GameMode::HumanVsHuman).is_zero());
    }

    #[test]
    fn test_file_store_round_trip() {
        let file_path = get_temp_file_path();
        let mut store = FileScoreStore::from_yaml_file(&file_path);
        let hva = ScoreTally { x: 1, o: 4, draws: 2 };
        store.save_score_tally(GameMode::HumanVsComputer, &hva);
        store.save_score_tally(GameMode::HumanVsHuman, &ScoreTally { x: 5, o: 0, draws: 0 });

        let reopened = FileScoreStore::from_yaml_file(&file_path);
        assert_eq!(reopened.load_score_tally(GameMode::HumanVsComputer), hva);
        assert_eq!(reopened.load_score_tally(GameMode::HumanVsHuman).x, 5);

        store.clear_score_tally(GameMode::HumanVsComputer);
        assert!(reopened.load_score_tally(GameMode::HumanVsComputer).is_zero());
        assert_eq!(reopened.load_score_tally(GameMode::HumanVsHuman).x, 5);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_missing_file_reads_as_zero() {
        let store = FileScoreStore::from_yaml_file("this_score_file_does_not_exist.yaml");
        assert!(store.load_score_tally(GameMode::HumanVsHuman).is_zero());
    }

    #[test]
    fn test_corrupt_file_reads_as_zero_and_is_replaced_on_save() {
        let file_path = get_temp_file_path();
        std::fs::write(&file_path, "hvh: [this is not a tally").unwrap();

        let mut store = FileScoreStore::from_yaml_file(&file_path);
        assert!(store.load_score_tally(GameMode::HumanVsHuman).is_zero());

        store.save_score_tally(GameMode::HumanVsHuman, &ScoreTally { x: 0, o: 1, draws: 0 });
        assert_eq!(store.load_score_tally(GameMode::HumanVsHuman).o, 1);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_partial_entries_default_to_zero() {
        let file_path = get_temp_file_path();
        std::fs::write(&file_path, "hva:\n  o: 2\n").unwrap();
        let store = FileScoreStore::from_yaml_file(&file_path);
        assert_eq!(
            store.load_score_tally(GameMode::HumanVsComputer),
            ScoreTally { x: 0, o: 2, draws: 0 }
        );
        let _ = std::fs::remove_file(file_path);
    }
}
