use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What the question asks for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum QuestionMode {
    /// show a definition, pick the word
    DefinitionToWord,
    /// show a word, pick the definition
    WordToDefinition,
    /// show a definition, type the word
    SpellingFromDefinition,
}

impl QuestionMode {
    pub fn is_spelling(&self) -> bool {
        matches!(self, QuestionMode::SpellingFromDefinition)
    }

    /// Multiple choice needs distractors; spelling tolerates a single entry.
    pub fn min_entries(&self) -> usize {
        if self.is_spelling() {
            1
        } else {
            2
        }
    }
}

/// Which dataset questions are drawn from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum PracticeMode {
    /// draw from the selected category, collecting wrong answers for review
    Normal,
    /// draw from previously missed entries, removing them when answered correctly
    ReviewWrongBook,
}

pub const NEAR_THRESHOLD_MIN: f64 = 70.0;
pub const NEAR_THRESHOLD_MAX: f64 = 95.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub question_mode: QuestionMode,
    pub practice_mode: PracticeMode,
    /// Display pacing only: drives the round progress gauge, never bounds a
    /// round.
    pub questions_per_round: usize,
    pub shuffle_options: bool,
    pub show_examples: bool,
    /// When off, spelling answers are graded by exact normalized match only.
    pub fuzzy_matching: bool,
    pub near_threshold_pct: f64,
    pub count_near_as_correct: bool,
    /// Seconds of feedback before the next question; 0 means wait for an
    /// explicit advance.
    pub auto_advance_secs: f64,
    pub exam_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_mode: QuestionMode::DefinitionToWord,
            practice_mode: PracticeMode::Normal,
            questions_per_round: 10,
            shuffle_options: true,
            show_examples: false,
            fuzzy_matching: true,
            near_threshold_pct: 85.0,
            count_near_as_correct: false,
            auto_advance_secs: 1.5,
            exam_length: 20,
        }
    }
}

impl Config {
    /// The configured near-miss threshold, clamped to the supported range.
    pub fn near_threshold(&self) -> f64 {
        self.near_threshold_pct
            .clamp(NEAR_THRESHOLD_MIN, NEAR_THRESHOLD_MAX)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "lexikon") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("lexikon_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
