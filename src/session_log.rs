//! Append-only log of finished rounds and exams.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;

use crate::config::{PracticeMode, QuestionMode};
use crate::error::QuizError;
use crate::session::SessionStats;

fn default_log_path() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("", "", "lexikon") {
        pd.config_dir().join("log.csv")
    } else {
        PathBuf::from("lexikon_log.csv")
    }
}

/// Append one result row to the log under the project config dir, emitting
/// the header on first use.
pub fn append_round(
    category: &str,
    question_mode: QuestionMode,
    practice_mode: PracticeMode,
    stats: &SessionStats,
) -> Result<(), QuizError> {
    append_round_to(&default_log_path(), category, question_mode, practice_mode, stats)
}

pub fn append_round_to(
    path: &Path,
    category: &str,
    question_mode: QuestionMode,
    practice_mode: PracticeMode,
    stats: &SessionStats,
) -> Result<(), QuizError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let needs_header = !path.exists();

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::Writer::from_writer(file);

    if needs_header {
        wtr.write_record([
            "date",
            "category",
            "question_mode",
            "practice_mode",
            "total",
            "correct",
            "accuracy",
        ])?;
    }

    let accuracy = if stats.total == 0 {
        0.0
    } else {
        stats.correct as f64 / stats.total as f64 * 100.0
    };
    wtr.write_record([
        Local::now().format("%c").to_string(),
        category.to_string(),
        question_mode.to_string(),
        practice_mode.to_string(),
        stats.total.to_string(),
        stats.correct.to_string(),
        format!("{accuracy:.1}"),
    ])?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn header_is_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let stats = SessionStats {
            xp: 3,
            correct: 3,
            total: 4,
            streak: 2,
        };

        append_round_to(
            &path,
            "All",
            QuestionMode::DefinitionToWord,
            PracticeMode::Normal,
            &stats,
        )
        .unwrap();
        append_round_to(
            &path,
            "All",
            QuestionMode::WordToDefinition,
            PracticeMode::Normal,
            &stats,
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,category,"));
        assert!(lines[1].contains("DefinitionToWord"));
        assert!(lines[1].ends_with(",4,3,75.0"));
        assert!(lines[2].contains("WordToDefinition"));
    }
}
