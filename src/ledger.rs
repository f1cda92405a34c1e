//! Per-word mastery counters and the wrong-answer review book.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::vocab::VocabularyEntry;

/// Cumulative counters for one word, across categories and sessions.
/// Updated monotonically; `seen == correct + wrong` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryRecord {
    pub seen: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl MasteryRecord {
    pub fn accuracy_percent(&self) -> f64 {
        if self.seen == 0 {
            0.0
        } else {
            self.correct as f64 / self.seen as f64 * 100.0
        }
    }
}

/// An entry most recently answered incorrectly. Deduplicated by the
/// (word, definition) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongBookEntry {
    pub word: String,
    pub definition: String,
    pub example: Option<String>,
}

impl From<&VocabularyEntry> for WrongBookEntry {
    fn from(e: &VocabularyEntry) -> Self {
        Self {
            word: e.word.clone(),
            definition: e.definition.clone(),
            example: e.example.clone(),
        }
    }
}

/// The only persisted structure: mastery counters plus the wrong book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub mastery: BTreeMap<String, MasteryRecord>,
    #[serde(rename = "wrongBook", default)]
    pub wrong_book: Vec<WrongBookEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasteryLedger {
    mastery: BTreeMap<String, MasteryRecord>,
    wrong_book: Vec<WrongBookEntry>,
}

impl MasteryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answered question for `word`, creating the record on first
    /// encounter.
    pub fn record_answer(&mut self, word: &str, correct: bool) {
        let rec = self.mastery.entry(word.to_string()).or_default();
        rec.seen += 1;
        if correct {
            rec.correct += 1;
        } else {
            rec.wrong += 1;
        }
    }

    pub fn mastery(&self) -> &BTreeMap<String, MasteryRecord> {
        &self.mastery
    }

    pub fn record(&self, word: &str) -> Option<&MasteryRecord> {
        self.mastery.get(word)
    }

    pub fn wrong_book(&self) -> &[WrongBookEntry] {
        &self.wrong_book
    }

    /// Append to the wrong book unless an entry with the same
    /// (word, definition) pair is already present.
    pub fn add_to_wrong_book(&mut self, entry: WrongBookEntry) {
        let exists = self
            .wrong_book
            .iter()
            .any(|e| e.word == entry.word && e.definition == entry.definition);
        if !exists {
            self.wrong_book.push(entry);
        }
    }

    /// Remove all wrong-book entries matching both fields. Given the dedup
    /// invariant, this matches at most one.
    pub fn remove_from_wrong_book(&mut self, word: &str, definition: &str) {
        self.wrong_book
            .retain(|e| !(e.word == word && e.definition == definition));
    }

    pub fn export_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            mastery: self.mastery.clone(),
            wrong_book: self.wrong_book.clone(),
        }
    }

    /// Replace in-memory state wholesale with the snapshot's contents.
    pub fn import_snapshot(&mut self, snapshot: ProgressSnapshot) {
        self.mastery = snapshot.mastery;
        self.wrong_book = snapshot.wrong_book;
    }

    pub fn export_json(&self) -> Result<String, QuizError> {
        Ok(serde_json::to_string_pretty(&self.export_snapshot())?)
    }

    /// Import a snapshot document with tolerant per-field merging: a field
    /// that is absent or malformed leaves the current value for that field
    /// unchanged. A document that is not a JSON object fails outright, with
    /// prior state untouched.
    pub fn import_json(&mut self, data: &str) -> Result<(), QuizError> {
        let value: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| QuizError::MalformedSnapshot(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| QuizError::MalformedSnapshot("expected a JSON object".into()))?;

        // Validate both fields before mutating anything.
        let mastery = obj
            .get("mastery")
            .and_then(|v| serde_json::from_value::<BTreeMap<String, MasteryRecord>>(v.clone()).ok());
        let wrong_book = obj
            .get("wrongBook")
            .and_then(|v| serde_json::from_value::<Vec<WrongBookEntry>>(v.clone()).ok());

        if let Some(mastery) = mastery {
            self.mastery = mastery;
        }
        if let Some(wrong_book) = wrong_book {
            self.wrong_book = wrong_book;
        }
        Ok(())
    }

    /// Write mastery counters as CSV, one row per word, sorted descending by
    /// accuracy then by seen count. The ordering is deterministic so exports
    /// can be diffed.
    pub fn write_mastery_csv<W: Write>(&self, writer: W) -> Result<(), QuizError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["word", "seen", "correct", "wrong", "accuracy_percent"])?;

        let rows = self
            .mastery
            .iter()
            .sorted_by(|(aw, a), (bw, b)| {
                b.accuracy_percent()
                    .partial_cmp(&a.accuracy_percent())
                    .unwrap_or(Ordering::Equal)
                    .then(b.seen.cmp(&a.seen))
                    .then(aw.cmp(bw))
            });

        for (word, rec) in rows {
            wtr.write_record([
                word.as_str(),
                &rec.seen.to_string(),
                &rec.correct.to_string(),
                &rec.wrong.to_string(),
                &format!("{:.1}", rec.accuracy_percent()),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Persistence for the ledger between runs.
pub trait ProgressStore {
    fn load(&self) -> MasteryLedger;
    fn save(&self, ledger: &MasteryLedger) -> Result<(), QuizError>;
}

/// JSON-file-backed store under the project data directory.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "lexikon") {
            pd.data_dir().join("progress.json")
        } else {
            PathBuf::from("lexikon_progress.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> MasteryLedger {
        let mut ledger = MasteryLedger::new();
        if let Ok(data) = fs::read_to_string(&self.path) {
            let _ = ledger.import_json(&data);
        }
        ledger
    }

    fn save(&self, ledger: &MasteryLedger) -> Result<(), QuizError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, ledger.export_json()?)?;
        Ok(())
    }
}
