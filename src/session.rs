//! The quiz session state machine.
//!
//! One `QuizSession` owns the active dataset, the current question, the
//! round's draw pool, the review queue, the mastery ledger, and the running
//! stats. Callers drive it through explicit transitions (`submit_answer`,
//! `advance`, `skip`, `reset_round`); nothing here depends on a rendering
//! cycle or a timer.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{Config, PracticeMode, QuestionMode};
use crate::error::QuizError;
use crate::exam::ExamState;
use crate::ledger::{MasteryLedger, WrongBookEntry};
use crate::normalize::{check_spelling, normalize, Verdict};
use crate::options::{pick_options, shuffle_paired, OPTION_COUNT};
use crate::srqueue::{ReviewQueue, REVIEW_DELAY};
use crate::vocab::{VocabularyEntry, VocabularyTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A question is displayed and no answer has been submitted.
    AwaitingAnswer,
    /// Feedback is showing; waiting for an elapsed delay or explicit advance.
    AwaitingAdvance,
    /// An exam ran out of questions. The score stays queryable until reset.
    Exhausted,
}

/// Session-scoped counters. Reset on round reset and on any category, mode,
/// or question-type change; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub xp: u32,
    pub correct: u32,
    pub total: u32,
    pub streak: u32,
}

/// A question as presented. Re-created per turn and discarded once answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt_text: String,
    pub prompt_is_definition: bool,
    pub target_index: usize,
    /// Empty for spelling questions.
    pub option_indices: Vec<usize>,
    pub option_texts: Vec<String>,
}

impl Question {
    pub fn is_spelling(&self) -> bool {
        self.option_indices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerInput {
    /// Selected option position (not a table index).
    Choice(usize),
    /// Free-text spelling attempt.
    Spelling(String),
}

/// What the presentation layer shows after a submission. A near miss that is
/// not counted as correct is reported distinctly from a plain miss.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Correct,
    NearAccepted { similarity: f64 },
    Near { similarity: f64, answer: String },
    Wrong { answer: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct | Feedback::NearAccepted { .. })
    }
}

#[derive(Debug)]
pub struct QuizSession {
    pub config: Config,
    pub stats: SessionStats,
    pub ledger: MasteryLedger,
    pub phase: SessionPhase,
    /// Present while an exam is running or its final score is still on show.
    pub exam: Option<ExamState>,
    category_name: String,
    category_table: VocabularyTable,
    /// The table questions are drawn from: the category table in normal
    /// mode, the materialized wrong book in review mode.
    table: VocabularyTable,
    question: Option<Question>,
    last_feedback: Option<Feedback>,
    indices_left: Vec<usize>,
    review_queue: ReviewQueue,
    auto_advance_remaining: Option<f64>,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(
        category: &str,
        table: VocabularyTable,
        config: Config,
        ledger: MasteryLedger,
    ) -> Result<Self, QuizError> {
        Self::with_rng(category, table, config, ledger, StdRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(
        category: &str,
        table: VocabularyTable,
        config: Config,
        ledger: MasteryLedger,
        seed: u64,
    ) -> Result<Self, QuizError> {
        Self::with_rng(category, table, config, ledger, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        category: &str,
        category_table: VocabularyTable,
        config: Config,
        ledger: MasteryLedger,
        rng: StdRng,
    ) -> Result<Self, QuizError> {
        let table = match config.practice_mode {
            PracticeMode::Normal => category_table.clone(),
            PracticeMode::ReviewWrongBook => {
                if ledger.wrong_book().is_empty() {
                    return Err(QuizError::EmptyWrongBook);
                }
                materialize_wrong_book(ledger.wrong_book())
            }
        };
        validate_table(&table, config.question_mode)?;

        let mut session = Self {
            config,
            stats: SessionStats::default(),
            ledger,
            phase: SessionPhase::AwaitingAnswer,
            exam: None,
            category_name: category.to_string(),
            category_table,
            table,
            question: None,
            last_feedback: None,
            indices_left: Vec::new(),
            review_queue: ReviewQueue::new(),
            auto_advance_remaining: None,
            rng,
        };
        session.select_next_question();
        Ok(session)
    }

    pub fn category(&self) -> &str {
        &self.category_name
    }

    pub fn table(&self) -> &VocabularyTable {
        &self.table
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    pub fn review_queue(&self) -> &ReviewQueue {
        &self.review_queue
    }

    /// The current entry's example sentence, if it has one.
    pub fn current_example(&self) -> Option<&str> {
        let q = self.question.as_ref()?;
        self.table.get(q.target_index)?.example.as_deref()
    }

    /// Progress within the display round: questions answered so far modulo
    /// the configured round length. Display pacing only.
    pub fn round_progress(&self) -> (usize, usize) {
        let per_round = self.config.questions_per_round.max(1);
        (self.stats.total as usize % per_round, per_round)
    }

    /// Evaluate an answer for the open question. Valid only in
    /// `AwaitingAnswer`; on success the session moves to `AwaitingAdvance`.
    pub fn submit_answer(&mut self, input: &AnswerInput) -> Result<Feedback, QuizError> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return Err(QuizError::InvalidTransition(
                "no question is awaiting an answer",
            ));
        }
        let question = self
            .question
            .clone()
            .ok_or(QuizError::InvalidTransition("no active question"))?;
        let entry = self
            .table
            .get(question.target_index)
            .cloned()
            .ok_or(QuizError::InvalidSubmission("question target out of bounds"))?;

        let feedback = self.grade(input, &question, &entry)?;
        let correct = feedback.is_correct();

        self.stats.total += 1;
        if correct {
            self.stats.xp += 1;
            self.stats.correct += 1;
            self.stats.streak += 1;
        } else {
            self.stats.streak = 0;
        }
        self.ledger.record_answer(&entry.word, correct);

        match self.config.practice_mode {
            PracticeMode::Normal if !correct => {
                self.ledger.add_to_wrong_book(WrongBookEntry::from(&entry));
            }
            PracticeMode::ReviewWrongBook if correct => {
                self.ledger
                    .remove_from_wrong_book(&entry.word, &entry.definition);
            }
            _ => {}
        }

        if correct {
            if let Some(exam) = self.exam.as_mut() {
                exam.record_correct();
            }
        } else {
            // Near-but-not-accepted goes to review just like a plain miss.
            self.review_queue
                .schedule(question.target_index, REVIEW_DELAY);
        }

        self.phase = SessionPhase::AwaitingAdvance;
        self.auto_advance_remaining =
            (self.config.auto_advance_secs > 0.0).then_some(self.config.auto_advance_secs);
        self.last_feedback = Some(feedback.clone());
        Ok(feedback)
    }

    fn grade(
        &self,
        input: &AnswerInput,
        question: &Question,
        entry: &VocabularyEntry,
    ) -> Result<Feedback, QuizError> {
        match (input, question.is_spelling()) {
            (AnswerInput::Choice(pos), false) => {
                let picked = *question
                    .option_indices
                    .get(*pos)
                    .ok_or(QuizError::InvalidSubmission("option position out of range"))?;
                if picked == question.target_index {
                    Ok(Feedback::Correct)
                } else {
                    Ok(Feedback::Wrong {
                        answer: self.answer_text(question, entry),
                    })
                }
            }
            (AnswerInput::Spelling(text), true) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(QuizError::InvalidSubmission("empty answer"));
                }
                if self.config.fuzzy_matching {
                    let check = check_spelling(text, &entry.word, self.config.near_threshold());
                    Ok(match check.verdict {
                        Verdict::Exact => Feedback::Correct,
                        Verdict::Near if self.config.count_near_as_correct => {
                            Feedback::NearAccepted {
                                similarity: check.similarity,
                            }
                        }
                        Verdict::Near => Feedback::Near {
                            similarity: check.similarity,
                            answer: entry.word.clone(),
                        },
                        Verdict::Wrong => Feedback::Wrong {
                            answer: entry.word.clone(),
                        },
                    })
                } else if normalize(text) == normalize(&entry.word) {
                    Ok(Feedback::Correct)
                } else {
                    Ok(Feedback::Wrong {
                        answer: entry.word.clone(),
                    })
                }
            }
            (AnswerInput::Choice(_), true) => Err(QuizError::InvalidSubmission(
                "spelling question expects typed text",
            )),
            (AnswerInput::Spelling(_), false) => Err(QuizError::InvalidSubmission(
                "multiple-choice question expects an option position",
            )),
        }
    }

    fn answer_text(&self, question: &Question, entry: &VocabularyEntry) -> String {
        if question.prompt_is_definition {
            entry.word.clone()
        } else {
            entry.definition.clone()
        }
    }

    /// Move past the feedback screen. Valid only in `AwaitingAdvance`.
    /// Concludes the exam when its last question slot was consumed.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        if self.phase != SessionPhase::AwaitingAdvance {
            return Err(QuizError::InvalidTransition("no answer has been submitted"));
        }
        self.advance_inner();
        Ok(())
    }

    /// Pass on the open question: resets the streak, no mastery or
    /// wrong-book effect, no exam score impact.
    pub fn skip(&mut self) -> Result<(), QuizError> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return Err(QuizError::InvalidTransition(
                "can only skip while a question is open",
            ));
        }
        self.stats.streak = 0;
        self.last_feedback = None;
        self.advance_inner();
        Ok(())
    }

    fn advance_inner(&mut self) {
        self.auto_advance_remaining = None;
        if let Some(exam) = self.exam.as_mut() {
            if exam.consume() {
                self.phase = SessionPhase::Exhausted;
                self.question = None;
                return;
            }
        }
        self.select_next_question();
        self.phase = SessionPhase::AwaitingAnswer;
    }

    /// Count down the auto-advance delay. Returns true when the delay
    /// elapsed and the session advanced. The caller owns the clock; with
    /// delay 0 this never fires and `advance` must be called explicitly.
    pub fn on_tick(&mut self, dt_secs: f64) -> bool {
        if self.phase != SessionPhase::AwaitingAdvance {
            return false;
        }
        let Some(remaining) = self.auto_advance_remaining.as_mut() else {
            return false;
        };
        *remaining -= dt_secs;
        if *remaining <= 0.0 {
            self.advance_inner();
            true
        } else {
            false
        }
    }

    /// Start over: fresh shuffled pool, cleared review queue and stats,
    /// cancelled exam, new first question. Available from any phase.
    pub fn reset_round(&mut self) {
        self.exam = None;
        self.review_queue.clear();
        self.stats = SessionStats::default();
        self.indices_left.clear();
        self.last_feedback = None;
        self.auto_advance_remaining = None;
        self.select_next_question();
        self.phase = SessionPhase::AwaitingAnswer;
    }

    /// Begin a scored exam of up to `length` questions (clamped to the pool
    /// size). Reshuffles the pool and draws the first question. The review
    /// queue is deliberately kept: misses during an exam still accumulate
    /// for later review.
    pub fn start_exam(&mut self, length: usize) -> Result<(), QuizError> {
        if length == 0 {
            return Err(QuizError::InvalidTransition(
                "exam length must be at least one question",
            ));
        }
        self.exam = Some(ExamState::start(length, self.table.len()));
        self.indices_left.clear();
        self.last_feedback = None;
        self.auto_advance_remaining = None;
        self.select_next_question();
        self.phase = SessionPhase::AwaitingAnswer;
        Ok(())
    }

    /// Switch the question type. Invalidates the current round.
    pub fn set_question_mode(&mut self, mode: QuestionMode) -> Result<(), QuizError> {
        validate_table(&self.table, mode)?;
        self.config.question_mode = mode;
        self.reset_round();
        Ok(())
    }

    /// Switch between normal practice and wrong-book review. Review mode
    /// materializes the wrong book into a fresh table; entering it with an
    /// empty wrong book is refused.
    pub fn set_practice_mode(&mut self, mode: PracticeMode) -> Result<(), QuizError> {
        let table = match mode {
            PracticeMode::Normal => self.category_table.clone(),
            PracticeMode::ReviewWrongBook => {
                if self.ledger.wrong_book().is_empty() {
                    return Err(QuizError::EmptyWrongBook);
                }
                materialize_wrong_book(self.ledger.wrong_book())
            }
        };
        validate_table(&table, self.config.question_mode)?;
        self.config.practice_mode = mode;
        self.table = table;
        self.reset_round();
        Ok(())
    }

    /// Swap in a different category table. Invalidates the current round;
    /// in review mode only the stored category changes until the caller
    /// switches back to normal practice.
    pub fn set_category(&mut self, name: &str, table: VocabularyTable) -> Result<(), QuizError> {
        if self.config.practice_mode == PracticeMode::Normal {
            validate_table(&table, self.config.question_mode)?;
            self.table = table.clone();
        }
        self.category_name = name.to_string();
        self.category_table = table;
        self.reset_round();
        Ok(())
    }

    /// Pick the next target index and build its question. Due review items
    /// preempt the shuffled draw; the draw pool samples without replacement
    /// and reshuffles once a full pass is exhausted.
    fn select_next_question(&mut self) {
        let target = match self.review_queue.tick() {
            Some(idx) if idx < self.table.len() => idx,
            Some(idx) => {
                debug_assert!(idx < self.table.len(), "stale review queue index {idx}");
                self.draw_from_pool()
            }
            None => self.draw_from_pool(),
        };
        self.question = Some(self.build_question(target));
    }

    fn draw_from_pool(&mut self) -> usize {
        if self.indices_left.is_empty() {
            let mut indices: Vec<usize> = (0..self.table.len()).collect();
            indices.shuffle(&mut self.rng);
            self.indices_left = indices;
        }
        self.indices_left
            .pop()
            .expect("validated tables are never empty")
    }

    fn build_question(&mut self, target: usize) -> Question {
        let entry = self.table.entries()[target].clone();
        if self.config.question_mode.is_spelling() {
            return Question {
                prompt_text: entry.definition,
                prompt_is_definition: true,
                target_index: target,
                option_indices: Vec::new(),
                option_texts: Vec::new(),
            };
        }

        let prompt_is_definition = self.config.question_mode == QuestionMode::DefinitionToWord;
        let mut option_indices =
            pick_options(&mut self.rng, self.table.len(), target, OPTION_COUNT);
        let mut option_texts: Vec<String> = option_indices
            .iter()
            .map(|&i| {
                let e = &self.table.entries()[i];
                if prompt_is_definition {
                    e.word.clone()
                } else {
                    e.definition.clone()
                }
            })
            .collect();
        if self.config.shuffle_options {
            shuffle_paired(&mut self.rng, &mut option_indices, &mut option_texts);
        }

        Question {
            prompt_text: if prompt_is_definition {
                entry.definition
            } else {
                entry.word
            },
            prompt_is_definition,
            target_index: target,
            option_indices,
            option_texts,
        }
    }
}

fn validate_table(table: &VocabularyTable, mode: QuestionMode) -> Result<(), QuizError> {
    if table.len() < mode.min_entries() {
        return Err(QuizError::MalformedDataset(format!(
            "{} needs at least {} entries, the table has {}",
            mode,
            mode.min_entries(),
            table.len()
        )));
    }
    Ok(())
}

fn materialize_wrong_book(entries: &[WrongBookEntry]) -> VocabularyTable {
    VocabularyTable::new(
        entries
            .iter()
            .map(|e| VocabularyEntry {
                word: e.word.clone(),
                definition: e.definition.clone(),
                example: e.example.clone(),
            })
            .collect(),
    )
}
