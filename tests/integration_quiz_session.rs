use lexikon::config::{Config, QuestionMode};
use lexikon::ledger::MasteryLedger;
use lexikon::session::{AnswerInput, Feedback, Question, QuizSession, SessionPhase};
use lexikon::srqueue::REVIEW_DELAY;
use lexikon::vocab::{VocabularyEntry, VocabularyTable};

/// End-to-end coverage of the quiz flow: question drawing, grading,
/// wrong-book accumulation, and spaced-repetition scheduling.

fn animal_table() -> VocabularyTable {
    VocabularyTable::new(vec![
        VocabularyEntry::new("cat", "a small domesticated feline", None),
        VocabularyEntry::new("dog", "a domesticated canine", None),
        VocabularyEntry::new("bird", "a feathered flying animal", None),
        VocabularyEntry::new("fish", "an aquatic gilled animal", None),
    ])
}

fn manual_config(mode: QuestionMode) -> Config {
    Config {
        question_mode: mode,
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

/// Skip forward until the open question targets `word`.
fn skip_until_word(session: &mut QuizSession, word: &str) {
    for _ in 0..16 {
        let q = session.question().unwrap();
        if session.table().entries()[q.target_index].word == word {
            return;
        }
        session.skip().unwrap();
    }
    panic!("never drew a question for {word}");
}

#[test]
fn wrong_answer_updates_every_ledger() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(QuestionMode::WordToDefinition),
        MasteryLedger::new(),
        7,
    )
    .unwrap();

    skip_until_word(&mut session, "cat");
    let q = session.question().unwrap().clone();
    assert!(!q.prompt_is_definition);
    assert_eq!(q.prompt_text, "cat");

    let feedback = session
        .submit_answer(&AnswerInput::Choice(wrong_position(&q)))
        .unwrap();
    assert!(matches!(feedback, Feedback::Wrong { .. }));

    assert_eq!(session.stats.total, 1);
    assert_eq!(session.stats.correct, 0);
    assert_eq!(session.stats.streak, 0);

    assert_eq!(session.ledger.wrong_book().len(), 1);
    assert_eq!(session.ledger.wrong_book()[0].word, "cat");
    assert_eq!(
        session.ledger.wrong_book()[0].definition,
        "a small domesticated feline"
    );

    let mastery = session.ledger.record("cat").unwrap();
    assert_eq!((mastery.seen, mastery.correct, mastery.wrong), (1, 0, 1));

    let items: Vec<_> = session.review_queue().iter().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].target, q.target_index);
    assert_eq!(items[0].due_in, REVIEW_DELAY);
}

#[test]
fn near_spelling_miss_is_distinct_but_still_reviewed() {
    let table = VocabularyTable::new(vec![
        VocabularyEntry::new("necessary", "required, essential", None),
        VocabularyEntry::new("separate", "set apart from others", None),
    ]);
    let mut config = manual_config(QuestionMode::SpellingFromDefinition);
    config.near_threshold_pct = 85.0;
    config.count_near_as_correct = false;
    let mut session =
        QuizSession::with_seed("All", table, config, MasteryLedger::new(), 3).unwrap();

    skip_until_word(&mut session, "necessary");
    let feedback = session
        .submit_answer(&AnswerInput::Spelling("neccessary".into()))
        .unwrap();

    match feedback {
        Feedback::Near { similarity, answer } => {
            assert!(similarity >= 85.0, "similarity was {similarity}");
            assert!(similarity < 100.0);
            assert_eq!(answer, "necessary");
        }
        other => panic!("expected a near miss, got {other:?}"),
    }
    assert_eq!(session.stats.correct, 0);
    assert_eq!(session.ledger.wrong_book().len(), 1);
    assert_eq!(session.ledger.wrong_book()[0].word, "necessary");
    assert_eq!(session.review_queue().len(), 1);
}

#[test]
fn full_round_covers_every_entry_before_repeating() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(QuestionMode::DefinitionToWord),
        MasteryLedger::new(),
        11,
    )
    .unwrap();

    let mut first_pass = Vec::new();
    for _ in 0..4 {
        let q = session.question().unwrap().clone();
        first_pass.push(q.target_index);
        session
            .submit_answer(&AnswerInput::Choice(correct_position(&q)))
            .unwrap();
        session.advance().unwrap();
    }
    first_pass.sort();
    assert_eq!(first_pass, vec![0, 1, 2, 3]);

    // the pool reshuffles and the next pass also covers everything
    let mut second_pass = Vec::new();
    for _ in 0..4 {
        let q = session.question().unwrap().clone();
        second_pass.push(q.target_index);
        session
            .submit_answer(&AnswerInput::Choice(correct_position(&q)))
            .unwrap();
        session.advance().unwrap();
    }
    second_pass.sort();
    assert_eq!(second_pass, vec![0, 1, 2, 3]);

    assert_eq!(session.stats.total, 8);
    assert_eq!(session.stats.streak, 8);
    assert_eq!(session.phase, SessionPhase::AwaitingAnswer);
}

#[test]
fn forced_review_preempts_the_random_draw() {
    let mut session = QuizSession::with_seed(
        "All",
        animal_table(),
        manual_config(QuestionMode::DefinitionToWord),
        MasteryLedger::new(),
        5,
    )
    .unwrap();

    let missed = session.question().unwrap().clone();
    session
        .submit_answer(&AnswerInput::Choice(wrong_position(&missed)))
        .unwrap();

    for _ in 0..2 {
        session.advance().unwrap();
        let q = session.question().unwrap().clone();
        assert_ne!(q.target_index, missed.target_index);
        session
            .submit_answer(&AnswerInput::Choice(correct_position(&q)))
            .unwrap();
    }

    session.advance().unwrap();
    assert_eq!(
        session.question().unwrap().target_index,
        missed.target_index
    );
    assert!(session.review_queue().is_empty());
}
