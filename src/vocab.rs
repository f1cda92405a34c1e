use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Category name used when a source carries a single unnamed table.
pub const SINGLE_CATEGORY: &str = "All";

/// Sheets named like this hold a table of contents, not vocabulary.
const EXCLUDED_CATEGORY: &str = "content page";

/// One word/definition pair, with an optional example sentence.
///
/// Immutable once loaded; `word` and `definition` are non-empty after
/// trimming (rows that fail this are dropped at load time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub definition: String,
    pub example: Option<String>,
}

impl VocabularyEntry {
    pub fn new(word: &str, definition: &str, example: Option<&str>) -> Self {
        Self {
            word: word.trim().to_string(),
            definition: definition.trim().to_string(),
            example: example
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }
}

/// An ordered table of entries from one category. Indices are stable for the
/// lifetime of a quiz round and are used as question identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyTable {
    entries: Vec<VocabularyEntry>,
}

impl VocabularyTable {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&VocabularyEntry> {
        self.entries.get(idx)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }
}

/// A named category and its table.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub table: VocabularyTable,
}

/// Where vocabulary comes from. Implementations parse some external format
/// into ordered category tables; the quiz core never touches files itself.
pub trait VocabularySource {
    fn load(&self) -> Result<Vec<Category>, QuizError>;
}

/// CSV-backed source: first column is the word, second the definition, an
/// optional third column holds an example sentence. The whole file is one
/// category named [`SINGLE_CATEGORY`].
#[derive(Debug, Clone)]
pub struct CsvVocabularySource {
    path: PathBuf,
}

impl CsvVocabularySource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl VocabularySource for CsvVocabularySource {
    fn load(&self) -> Result<Vec<Category>, QuizError> {
        let file = File::open(&self.path)?;
        let table = read_csv_table(file)?;
        Ok(vec![Category {
            name: SINGLE_CATEGORY.to_string(),
            table,
        }])
    }
}

/// In-memory source, mainly for tests and for materializing the wrong book.
#[derive(Debug, Clone, Default)]
pub struct MemoryVocabularySource {
    categories: Vec<Category>,
}

impl MemoryVocabularySource {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

impl VocabularySource for MemoryVocabularySource {
    fn load(&self) -> Result<Vec<Category>, QuizError> {
        Ok(self.categories.clone())
    }
}

/// Parse a CSV stream (with a header row) into a table, trimming fields and
/// dropping rows without both a word and a definition.
pub fn read_csv_table<R: Read>(reader: R) -> Result<VocabularyTable, QuizError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    if rdr.headers()?.len() < 2 {
        return Err(QuizError::MalformedDataset(
            "the file needs at least two columns: word, definition".into(),
        ));
    }

    let mut entries = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let word = record.get(0).unwrap_or_default().trim();
        let definition = record.get(1).unwrap_or_default().trim();
        if word.is_empty() || definition.is_empty() {
            continue;
        }
        entries.push(VocabularyEntry::new(word, definition, record.get(2)));
    }

    Ok(VocabularyTable::new(entries))
}

/// Drop categories excluded by convention ("content page", case-insensitive)
/// and categories left empty after row filtering.
pub fn filter_categories(categories: Vec<Category>) -> Vec<Category> {
    categories
        .into_iter()
        .filter(|c| !c.name.eq_ignore_ascii_case(EXCLUDED_CATEGORY))
        .filter(|c| !c.table.is_empty())
        .collect()
}
