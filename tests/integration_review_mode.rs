use lexikon::config::{Config, PracticeMode, QuestionMode};
use lexikon::error::QuizError;
use lexikon::ledger::MasteryLedger;
use lexikon::session::{AnswerInput, Question, QuizSession};
use lexikon::vocab::{VocabularyEntry, VocabularyTable};

fn animal_table() -> VocabularyTable {
    VocabularyTable::new(vec![
        VocabularyEntry::new("cat", "a small domesticated feline", Some("The cat sat.")),
        VocabularyEntry::new("dog", "a domesticated canine", None),
        VocabularyEntry::new("bird", "a feathered flying animal", None),
        VocabularyEntry::new("fish", "an aquatic gilled animal", None),
    ])
}

fn manual_config() -> Config {
    Config {
        question_mode: QuestionMode::DefinitionToWord,
        auto_advance_secs: 0.0,
        ..Config::default()
    }
}

fn correct_position(q: &Question) -> usize {
    q.option_indices
        .iter()
        .position(|&i| i == q.target_index)
        .unwrap()
}

fn wrong_position(q: &Question) -> usize {
    q.option_indices
        .iter()
        .position(|&i| i != q.target_index)
        .unwrap()
}

fn miss_n_questions(session: &mut QuizSession, n: usize) {
    for i in 0..n {
        let q = session.question().unwrap().clone();
        session
            .submit_answer(&AnswerInput::Choice(wrong_position(&q)))
            .unwrap();
        if i + 1 < n {
            session.advance().unwrap();
        }
    }
}

#[test]
fn review_draws_from_the_wrong_book_and_clears_on_correct() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(),
        MasteryLedger::new(),
        17,
    )
    .unwrap();

    miss_n_questions(&mut session, 2);
    assert_eq!(session.ledger.wrong_book().len(), 2);
    let missed_words: Vec<String> = session
        .ledger
        .wrong_book()
        .iter()
        .map(|e| e.word.clone())
        .collect();

    session
        .set_practice_mode(PracticeMode::ReviewWrongBook)
        .unwrap();
    assert_eq!(session.table().len(), 2);
    assert_eq!(session.stats.total, 0);
    assert!(session.review_queue().is_empty());

    // answer one review question correctly; its entry leaves the book
    let q = session.question().unwrap().clone();
    let word = session.table().entries()[q.target_index].word.clone();
    assert!(missed_words.contains(&word));
    session
        .submit_answer(&AnswerInput::Choice(correct_position(&q)))
        .unwrap();
    assert_eq!(session.ledger.wrong_book().len(), 1);
    assert!(session.ledger.wrong_book().iter().all(|e| e.word != word));

    // indices stay stable for the rest of the round even though the book
    // shrank
    assert_eq!(session.table().len(), 2);
}

#[test]
fn wrong_answer_in_review_keeps_the_entry() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(),
        MasteryLedger::new(),
        19,
    )
    .unwrap();

    miss_n_questions(&mut session, 2);
    session
        .set_practice_mode(PracticeMode::ReviewWrongBook)
        .unwrap();

    let q = session.question().unwrap().clone();
    session
        .submit_answer(&AnswerInput::Choice(wrong_position(&q)))
        .unwrap();
    // still two entries: review misses are not re-added, just kept
    assert_eq!(session.ledger.wrong_book().len(), 2);
    assert_eq!(session.review_queue().len(), 1);
}

#[test]
fn empty_wrong_book_blocks_review_mode() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(),
        MasteryLedger::new(),
        23,
    )
    .unwrap();
    let err = session
        .set_practice_mode(PracticeMode::ReviewWrongBook)
        .unwrap_err();
    assert!(matches!(err, QuizError::EmptyWrongBook));
    assert_eq!(session.config.practice_mode, PracticeMode::Normal);
    assert!(session.question().is_some());
}

#[test]
fn leaving_review_mode_restores_the_category_table() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(),
        MasteryLedger::new(),
        29,
    )
    .unwrap();

    miss_n_questions(&mut session, 2);
    session
        .set_practice_mode(PracticeMode::ReviewWrongBook)
        .unwrap();
    assert_eq!(session.table().len(), 2);

    session.set_practice_mode(PracticeMode::Normal).unwrap();
    assert_eq!(session.table().len(), 4);
    assert_eq!(session.category(), "All");
    assert_eq!(session.stats.total, 0);
}

#[test]
fn review_carries_example_sentences_over() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(),
        MasteryLedger::new(),
        31,
    )
    .unwrap();

    // miss questions until the book holds "cat" plus at least one other
    // entry, enough to back a multiple-choice review round
    for _ in 0..16 {
        let book = session.ledger.wrong_book();
        if book.len() >= 2 && book.iter().any(|e| e.word == "cat") {
            break;
        }
        let q = session.question().unwrap().clone();
        session
            .submit_answer(&AnswerInput::Choice(wrong_position(&q)))
            .unwrap();
        session.advance().unwrap();
    }
    assert!(session.ledger.wrong_book().iter().any(|e| e.word == "cat"));

    session
        .set_practice_mode(PracticeMode::ReviewWrongBook)
        .unwrap();

    let cat = session
        .ledger
        .wrong_book()
        .iter()
        .find(|e| e.word == "cat")
        .unwrap();
    assert_eq!(cat.example.as_deref(), Some("The cat sat."));
}
