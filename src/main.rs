mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use lexikon::config::{Config, ConfigStore, FileConfigStore, PracticeMode, QuestionMode};
use lexikon::ledger::{FileProgressStore, ProgressStore};
use lexikon::runtime::{CrosstermEventSource, QuizEvent, Runner, TICK_RATE_MS};
use lexikon::session::{AnswerInput, QuizSession, SessionPhase};
use lexikon::session_log;
use lexikon::vocab::{filter_categories, Category, CsvVocabularySource, VocabularySource};

/// terminal vocabulary quiz with spaced repetition and mastery tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal vocabulary quiz. Feed it a CSV (word, definition, optional example) and drill with multiple-choice or spelling questions; missed words resurface via spaced repetition and collect in a reviewable wrong book."
)]
pub struct Cli {
    /// vocabulary CSV file: word, definition, optional example
    file: Option<PathBuf>,

    /// question type to start with
    #[clap(short = 'm', long, value_enum)]
    question_mode: Option<QuestionMode>,

    /// questions per round shown on the progress gauge
    #[clap(short = 'n', long)]
    questions_per_round: Option<usize>,

    /// show example sentences with the prompt when available
    #[clap(long)]
    show_examples: bool,

    /// disable fuzzy spelling comparison (exact match only)
    #[clap(long)]
    no_fuzzy: bool,

    /// near-miss similarity threshold in percent (70-95)
    #[clap(long)]
    near_threshold: Option<f64>,

    /// grade near-miss spellings as correct
    #[clap(long)]
    count_near_as_correct: bool,

    /// seconds before auto-advancing past feedback (0 = wait for enter)
    #[clap(short = 'a', long)]
    auto_advance: Option<f64>,

    /// number of questions per exam
    #[clap(long)]
    exam_length: Option<usize>,

    /// write the mastery table as CSV to this path and exit
    #[clap(long, value_name = "PATH")]
    export_mastery: Option<PathBuf>,

    /// write the progress snapshot as JSON to this path and exit
    #[clap(long, value_name = "PATH")]
    export_progress: Option<PathBuf>,

    /// merge a progress snapshot from this path and exit
    #[clap(long, value_name = "PATH")]
    import_progress: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.question_mode {
            config.question_mode = mode;
        }
        if let Some(n) = self.questions_per_round {
            config.questions_per_round = n.max(1);
        }
        if self.show_examples {
            config.show_examples = true;
        }
        if self.no_fuzzy {
            config.fuzzy_matching = false;
        }
        if let Some(pct) = self.near_threshold {
            config.near_threshold_pct = pct;
        }
        if self.count_near_as_correct {
            config.count_near_as_correct = true;
        }
        if let Some(secs) = self.auto_advance {
            config.auto_advance_secs = secs.max(0.0);
        }
        if let Some(len) = self.exam_length {
            config.exam_length = len.max(1);
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: QuizSession,
    pub categories: Vec<Category>,
    pub active_category: usize,
    /// Highlighted option position for multiple-choice questions.
    pub selected: usize,
    /// Typed buffer for spelling questions.
    pub typed: String,
    /// Guidance shown in the footer (e.g. empty wrong book).
    pub notice: Option<String>,
}

impl App {
    pub fn is_spelling(&self) -> bool {
        self.session
            .question()
            .map(|q| q.is_spelling())
            .unwrap_or(false)
    }

    fn clear_input(&mut self) {
        self.selected = 0;
        self.typed.clear();
    }

    fn next_category(&mut self) {
        if self.categories.len() < 2 {
            return;
        }
        self.active_category = (self.active_category + 1) % self.categories.len();
        let cat = self.categories[self.active_category].clone();
        match self.session.set_category(&cat.name, cat.table) {
            Ok(()) => self.clear_input(),
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    fn toggle_review(&mut self) {
        let target = match self.session.config.practice_mode {
            PracticeMode::Normal => PracticeMode::ReviewWrongBook,
            PracticeMode::ReviewWrongBook => PracticeMode::Normal,
        };
        match self.session.set_practice_mode(target) {
            Ok(()) => self.clear_input(),
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    fn start_exam(&mut self) {
        let length = self.session.config.exam_length;
        match self.session.start_exam(length) {
            Ok(()) => self.clear_input(),
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    fn submit(&mut self) {
        let input = if self.is_spelling() {
            if self.typed.trim().is_empty() {
                return;
            }
            AnswerInput::Spelling(self.typed.clone())
        } else {
            AnswerInput::Choice(self.selected)
        };
        if self.session.submit_answer(&input).is_ok() {
            self.notice = None;
        }
    }

    fn advance(&mut self) {
        if self.session.advance().is_ok() {
            self.clear_input();
        }
    }

    fn skip(&mut self) {
        if self.session.skip().is_ok() {
            self.clear_input();
        }
    }

    fn reset_round(&mut self) {
        self.session.reset_round();
        self.clear_input();
        self.notice = None;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply(&mut config);

    let progress_store = FileProgressStore::new();

    if let Some(path) = &cli.export_mastery {
        let ledger = progress_store.load();
        let file = fs::File::create(path)?;
        ledger.write_mastery_csv(file)?;
        println!("wrote mastery export to {}", path.display());
        return Ok(());
    }
    if let Some(path) = &cli.export_progress {
        let ledger = progress_store.load();
        fs::write(path, ledger.export_json()?)?;
        println!("wrote progress snapshot to {}", path.display());
        return Ok(());
    }
    if let Some(path) = &cli.import_progress {
        let mut ledger = progress_store.load();
        ledger.import_json(&fs::read_to_string(path)?)?;
        progress_store.save(&ledger)?;
        println!("imported progress snapshot from {}", path.display());
        return Ok(());
    }

    let Some(file) = cli.file.clone() else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::MissingRequiredArgument, "a vocabulary CSV file is required")
            .exit();
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let categories = filter_categories(CsvVocabularySource::new(&file).load()?);
    let Some(first) = categories.first().cloned() else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "no usable vocabulary in the file")
            .exit();
    };

    let ledger = progress_store.load();
    let session = QuizSession::new(&first.name, first.table, config, ledger)?;
    let mut app = App {
        session,
        categories,
        active_category: 0,
        selected: 0,
        typed: String::new(),
        notice: None,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // progress survives the session; the round result goes to the log
    progress_store.save(&app.session.ledger)?;
    if app.session.stats.total > 0 {
        let _ = session_log::append_round(
            app.session.category(),
            app.session.config.question_mode,
            app.session.config.practice_mode,
            &app.session.stats,
        );
    }
    config_store.save(&app.session.config)?;

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            QuizEvent::Tick => {
                if app.session.on_tick(TICK_RATE_MS as f64 / 1000.0) {
                    app.clear_input();
                }
            }
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Esc {
        return true;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.session.phase {
        SessionPhase::AwaitingAnswer if app.is_spelling() => {
            // commands stay on control chords so letters reach the buffer
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('s') => app.skip(),
                    KeyCode::Char('b') => app.toggle_review(),
                    KeyCode::Char('e') => app.start_exam(),
                    KeyCode::Char('r') => app.reset_round(),
                    KeyCode::Char('t') => app.next_category(),
                    _ => {}
                }
                return false;
            }
            match key.code {
                KeyCode::Char(c) => app.typed.push(c),
                KeyCode::Backspace => {
                    app.typed.pop();
                }
                KeyCode::Enter => app.submit(),
                _ => {}
            }
        }
        SessionPhase::AwaitingAnswer => {
            let option_count = app
                .session
                .question()
                .map(|q| q.option_texts.len())
                .unwrap_or(0);
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    app.selected = app.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if app.selected + 1 < option_count {
                        app.selected += 1;
                    }
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let pos = (c as usize) - ('1' as usize);
                    if pos < option_count {
                        app.selected = pos;
                    }
                }
                KeyCode::Enter => app.submit(),
                KeyCode::Char('s') => app.skip(),
                KeyCode::Char('b') => app.toggle_review(),
                KeyCode::Char('e') => app.start_exam(),
                KeyCode::Char('r') => app.reset_round(),
                KeyCode::Char('t') => app.next_category(),
                _ => {}
            }
        }
        SessionPhase::AwaitingAdvance => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => app.advance(),
            KeyCode::Char('r') => app.reset_round(),
            _ => {}
        },
        SessionPhase::Exhausted => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => app.reset_round(),
            _ => {}
        },
    }
    false
}
