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
    io::{self, stdin},
    path::PathBuf,
    sync::{mpsc::Sender, Arc},
    time::Duration,
};
use webbrowser::Browser;

use kwiz::{
    content::{ContentError, ContentStore, DirContentStore, EmbeddedContentStore, Quiz, TestEntry},
    nav::Route,
    profile::{FileProfileStore, Profile, ProfileStore},
    runtime::{
        spawn_fetch, AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker,
    },
    session::{InfoKind, Progress, Session, SessionPhase},
};

use crate::ui::ui;

const TICK_RATE_MS: u64 = 100;

/// terminal quiz app with multiple-choice tests and scored results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz app: pick a test from the home list, answer multiple-choice questions with instant feedback and explanations, and finish with a scored results screen."
)]
pub struct Cli {
    /// screen to open at startup, e.g. "quiz/1" or "results?testId=1&score=3&total=4"
    #[clap(value_name = "ROUTE")]
    route: Option<String>,

    /// load test documents from a directory instead of the embedded set
    #[clap(short = 'c', long, value_name = "DIR")]
    content_dir: Option<PathBuf>,
}

/// Which screen the app is currently showing. Derived from the session
/// phase plus the failed-load marker; never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    Loading,
    Quiz,
    Results,
    NotFound,
}

/// An open info overlay (answer information or vocabulary).
#[derive(Debug, Clone)]
pub struct Popup {
    pub kind: InfoKind,
    pub items: Vec<String>,
}

pub struct App {
    pub store: Arc<dyn ContentStore>,
    pub profile: Profile,
    pub entries: Vec<TestEntry>,
    pub selected: usize,
    pub phase: SessionPhase,
    /// Test id whose fetch failed; drives the not-found view
    pub failed: Option<String>,
    pub popup: Option<Popup>,
    /// Tick counter, drives the loading animation
    pub ticks: u64,
    generation: u64,
}

impl App {
    pub fn new(store: Arc<dyn ContentStore>, profile: Profile) -> Self {
        let entries = store.list();
        Self {
            store,
            profile,
            entries,
            selected: 0,
            phase: SessionPhase::Idle,
            failed: None,
            popup: None,
            ticks: 0,
            generation: 0,
        }
    }

    pub fn view(&self) -> View {
        if self.failed.is_some() {
            return View::NotFound;
        }
        match self.phase {
            SessionPhase::Idle => View::Home,
            SessionPhase::Loading { .. } => View::Loading,
            SessionPhase::Active(_) => View::Quiz,
            SessionPhase::Completed { .. } => View::Results,
        }
    }

    /// Navigate to a route. Opening a quiz kicks off an asynchronous fetch;
    /// every navigation closes any popup and clears a failed-load marker.
    pub fn open(&mut self, route: Route, tx: &Sender<AppEvent>) {
        self.popup = None;
        self.failed = None;
        match route {
            Route::Home => self.phase = SessionPhase::Idle,
            Route::Quiz { test_id } => {
                self.generation += 1;
                self.phase = SessionPhase::Loading {
                    test_id: test_id.clone(),
                    generation: self.generation,
                };
                spawn_fetch(self.store.clone(), test_id, self.generation, tx.clone());
            }
            Route::Results {
                test_id,
                score,
                total,
            } => {
                self.phase = SessionPhase::Completed {
                    test_id,
                    score,
                    total,
                };
            }
        }
    }

    /// A fetch finished. Stale results (the user left the loading screen,
    /// or a newer load superseded this one) are dropped on the floor.
    pub fn on_loaded(
        &mut self,
        test_id: String,
        generation: u64,
        result: Result<Quiz, ContentError>,
    ) {
        if !self.phase.accepts_load(&test_id, generation) {
            return;
        }
        match result {
            Ok(quiz) => self.phase = SessionPhase::Active(Session::new(test_id, quiz)),
            Err(_) => {
                self.phase = SessionPhase::Idle;
                self.failed = Some(test_id);
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::Active(session) => Some(session),
            _ => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.phase {
            SessionPhase::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn final_score(&self) -> Option<(u32, u32)> {
        match &self.phase {
            SessionPhase::Completed { score, total, .. } => Some((*score, *total)),
            _ => None,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store: Arc<dyn ContentStore> = match &cli.content_dir {
        Some(dir) => Arc::new(DirContentStore::new(dir)),
        None => Arc::new(EmbeddedContentStore::new()),
    };
    let profile = FileProfileStore::new().load();
    let initial = cli
        .route
        .as_deref()
        .map(Route::parse)
        .unwrap_or(Route::Home);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let tx = events.sender();
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    let mut app = App::new(store, profile);
    app.open(initial, &tx);

    let res = start_tui(&mut terminal, &mut app, &runner, &tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

#[derive(Debug, PartialEq)]
enum KeyFlow {
    Continue,
    Quit,
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    tx: &Sender<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                app.ticks = app.ticks.wrapping_add(1);
                // Only the loading screen animates; skip redraws elsewhere
                if app.view() == View::Loading {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Loaded {
                test_id,
                generation,
                result,
            } => {
                app.on_loaded(test_id, generation, result);
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if handle_key(app, key, tx) == KeyFlow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &Sender<AppEvent>) -> KeyFlow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyFlow::Quit;
    }

    // An open popup swallows input until dismissed
    if app.popup.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.popup = None;
        }
        return KeyFlow::Continue;
    }

    match app.view() {
        View::Home => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyFlow::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                if app.selected > 0 {
                    app.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.selected + 1 < app.entries.len() {
                    app.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(entry) = app.entries.get(app.selected) {
                    let test_id = entry.id.clone();
                    app.open(Route::Quiz { test_id }, tx);
                }
            }
            _ => {}
        },
        View::Loading => {
            // Leaving while the fetch is pending abandons it; the stale
            // result is discarded when it eventually arrives
            if key.code == KeyCode::Esc {
                app.open(Route::Home, tx);
            }
        }
        View::Quiz => return handle_quiz_key(app, key, tx),
        View::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyFlow::Quit,
            KeyCode::Char('r') => {
                if let SessionPhase::Completed { test_id, .. } = &app.phase {
                    let test_id = test_id.clone();
                    app.open(Route::Quiz { test_id }, tx);
                }
            }
            KeyCode::Char('h') | KeyCode::Enter => app.open(Route::Home, tx),
            KeyCode::Char('s') => {
                if let SessionPhase::Completed { score, total, .. } = &app.phase {
                    share_score(*score, *total);
                }
            }
            _ => {}
        },
        View::NotFound => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.open(Route::Home, tx);
            }
        }
    }

    KeyFlow::Continue
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, tx: &Sender<AppEvent>) -> KeyFlow {
    match key.code {
        KeyCode::Esc => {
            // Abandon the attempt; the session is discarded, not persisted
            app.open(Route::Home, tx);
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(session) = app.session_mut() {
                // One locked-in answer per visit; further input is ignored
                // until the user navigates
                if !session.is_revealed() {
                    let idx = (c as u8 - b'1') as usize;
                    if let Some(answer) = session.current_question().answers.get(idx).cloned() {
                        session.select_answer(&answer);
                    }
                }
            }
        }
        KeyCode::Char('i') => {
            if let Some(items) = app.session().map(|s| s.info(InfoKind::AnswerInfo)) {
                app.popup = Some(Popup {
                    kind: InfoKind::AnswerInfo,
                    items,
                });
            }
        }
        KeyCode::Char('v') => {
            if let Some(items) = app.session().map(|s| s.info(InfoKind::Vocabulary)) {
                app.popup = Some(Popup {
                    kind: InfoKind::Vocabulary,
                    items,
                });
            }
        }
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('n') => {
            let mut finished = None;
            if let Some(session) = app.session_mut() {
                // Err means the current question is unanswered; the control
                // is disabled in the UI, so just ignore it here
                match session.advance() {
                    Ok(Progress::Finished { score, total }) => {
                        finished = Some((session.test_id.clone(), score, total));
                    }
                    Ok(Progress::Moved) | Err(_) => {}
                }
            }
            if let Some((test_id, score, total)) = finished {
                app.open(
                    Route::Results {
                        test_id,
                        score,
                        total,
                    },
                    tx,
                );
            }
        }
        KeyCode::Left | KeyCode::Char('p') => {
            if let Some(session) = app.session_mut() {
                let _ = session.retreat();
            }
        }
        _ => {}
    }

    KeyFlow::Continue
}

fn share_score(score: u32, total: u32) {
    if Browser::is_available() {
        webbrowser::open(&format!(
            "https://twitter.com/intent/tweet?text=I%20scored%20{}%2F{}%20on%20the%20quiz%21",
            score, total
        ))
        .unwrap_or_default();
    }
}
