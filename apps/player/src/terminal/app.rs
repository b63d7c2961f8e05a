//! Screen state and the event loop.

use super::animation::AnimationQueue;
use super::display::{hit_test, Display, TILE_IMAGES};
use super::input::{spawn_reader, InputHandler, UiEvent};
use super::TerminalGuard;
use crate::commands::{self, CommandError, LessonSummary};
use crate::state::AppState;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use lesson_core::{
    HistoryEntry, KeyboardHub, LessonSession, RotationHandle, SessionError, SessionView, SpeechSynthesizer,
    RESET_PROMPT,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Lesson,
    History,
    ConfirmReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the terminal front end shows, driven one event at a time.
pub struct App {
    state: AppState,
    session: LessonSession,
    lessons: Vec<LessonSummary>,
    cursor: usize,
    screen: Screen,
    rotation: Option<RotationHandle>,
    animations: AnimationQueue,
    animation: Duration,
    releases_reported: bool,
    history: Vec<HistoryEntry>,
    notice: Option<String>,
}

impl App {
    /// Build the app on the home screen. Must run inside a tokio runtime.
    pub fn new(
        state: AppState,
        speech: Arc<dyn SpeechSynthesizer>,
        releases_reported: bool,
    ) -> Result<Self, CommandError> {
        let session = commands::new_session(&state, KeyboardHub::new(), speech)?;
        let lessons = commands::list_lessons(&state.catalog);
        let animation = Duration::from_millis(state.config.animation_ms);

        let mut app = Self {
            state,
            session,
            lessons,
            cursor: 0,
            screen: Screen::Lesson,
            rotation: None,
            animations: AnimationQueue::new(),
            animation,
            releases_reported,
            history: Vec::new(),
            notice: None,
        };
        app.go_home();
        Ok(app)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> &LessonSession {
        &self.session
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.animations.next_deadline()
    }

    pub fn pending_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    fn go_home(&mut self) {
        self.session.leave();
        self.animations.clear();
        self.screen = Screen::Home;
        if self.rotation.is_none() {
            self.rotation = Some(RotationHandle::spawn(TILE_IMAGES.len(), rand::random()));
        }
    }

    fn leave_home(&mut self, screen: Screen) {
        // Dropping the handle stops the rotation task.
        self.rotation = None;
        self.notice = None;
        self.screen = screen;
    }

    /// Start a lesson by its indices.
    pub fn open_lesson(&mut self, section: usize, lesson: usize, now: Instant) {
        self.leave_home(Screen::Lesson);
        let result = self.session.load(section, lesson);
        self.after_session(result, now);
    }

    fn after_session(&mut self, result: Result<(), SessionError>, now: Instant) {
        if let Err(e) = result {
            error!(error = %e, "failed to record lesson");
            self.notice = Some(format!("Could not save history: {e}"));
        }
        let board = self.session.board();
        self.animations.sync(board.as_ref(), now, self.animation);
    }

    /// Deliver mismatch-feedback deadlines that have passed.
    pub fn fire_animations(&mut self, now: Instant) {
        let generation = self.session.board().map(|b| b.generation);
        for target in self.animations.take_due(now, generation) {
            let result = self.session.animation_end(target);
            self.after_session(result, now);
        }
    }

    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Flow {
        match event {
            UiEvent::Key(key) if InputHandler::is_exit(&key) => Flow::Quit,
            UiEvent::Key(key) => {
                if !InputHandler::is_key_up(&key, self.releases_reported) {
                    return Flow::Continue;
                }
                match self.screen {
                    Screen::Home => self.home_key(key.code, now),
                    Screen::Lesson => self.lesson_key(&key, now),
                    Screen::History => self.history_key(key.code),
                    Screen::ConfirmReset => self.confirm_key(key.code),
                }
            }
            UiEvent::Click { column, row } => {
                if self.screen == Screen::Lesson {
                    if let Some(target) = self.session.board().and_then(|b| hit_test(&b, column, row)) {
                        let result = self.session.click(target);
                        self.after_session(result, now);
                    }
                }
                Flow::Continue
            }
            UiEvent::Resize => Flow::Continue,
        }
    }

    fn home_key(&mut self, code: KeyCode, now: Instant) -> Flow {
        match code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.lessons.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(lesson) = self.lessons.get(self.cursor) {
                    let (section, index) = (lesson.section_index, lesson.lesson_index);
                    self.open_lesson(section, index, now);
                }
            }
            KeyCode::Char('h') => self.open_history(),
            KeyCode::Esc => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn lesson_key(&mut self, key: &KeyEvent, now: Instant) -> Flow {
        let playing = matches!(self.session.view(), SessionView::Playing { .. });
        match key.code {
            KeyCode::Esc => self.go_home(),
            KeyCode::Enter if !playing => self.go_home(),
            _ if playing => {
                if let Some(c) = InputHandler::key_to_char(key) {
                    let result = self.session.key_up(c);
                    self.after_session(result, now);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn open_history(&mut self) {
        self.leave_home(Screen::History);
        self.reload_history();
    }

    fn reload_history(&mut self) {
        match commands::list_history(&self.state) {
            Ok(entries) => self.history = entries,
            Err(e) => {
                self.history.clear();
                self.notice = Some(e.message);
            }
        }
    }

    fn history_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('x') => {
                let dir = self.state.config.export_dir();
                self.notice = Some(match commands::export_history_file(&self.state, &dir, Utc::now()) {
                    Ok(path) => format!("Exported to {}", path.display()),
                    Err(e) => format!("Export failed: {e}"),
                });
            }
            KeyCode::Char('r') => {
                self.notice = None;
                self.screen = Screen::ConfirmReset;
            }
            KeyCode::Esc => {
                self.notice = None;
                self.go_home();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn confirm_key(&mut self, code: KeyCode) -> Flow {
        let approved = code == KeyCode::Char('y');
        self.notice = Some(match commands::reset_history(&self.state, &mut |_: &str| approved) {
            Ok(true) => "History reset".to_string(),
            Ok(false) => "Reset cancelled".to_string(),
            Err(e) => format!("Reset failed: {e}"),
        });
        self.screen = Screen::History;
        self.reload_history();
        Flow::Continue
    }

    pub fn draw(&self, display: &mut Display) -> std::io::Result<()> {
        let notice = self.notice.as_deref();
        match self.screen {
            Screen::Home => {
                let tiles = self
                    .rotation
                    .as_ref()
                    .map(RotationHandle::tiles)
                    .unwrap_or([0, 1, 2, 3]);
                display.home(&self.lessons, self.cursor, tiles, notice)
            }
            Screen::History => display.history(&self.history, notice),
            Screen::ConfirmReset => display.confirm(RESET_PROMPT),
            Screen::Lesson => match self.session.view() {
                SessionView::Playing {
                    lesson,
                    stage,
                    stage_count,
                    kind,
                } => match self.session.board() {
                    Some(board) => display.board(&lesson.title, stage, stage_count, &board),
                    None => display.stage(&lesson.title, stage, stage_count, kind.as_str()),
                },
                SessionView::Completed { entry } => display.completed(&entry, notice),
                SessionView::NotFound { section, lesson } => display.not_found(section, lesson),
                SessionView::Idle => display.home(&self.lessons, self.cursor, [0, 1, 2, 3], notice),
            },
        }
    }

    /// Resolves when the home tiles change. Never resolves off the home
    /// screen.
    async fn rotation_changed(&mut self) {
        match self.rotation.as_mut() {
            Some(rotation) => {
                if !rotation.changed().await {
                    self.rotation = None;
                }
            }
            None => std::future::pending().await,
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Run the player until the user quits.
pub async fn run(
    state: AppState,
    speech: Arc<dyn SpeechSynthesizer>,
    start: Option<(usize, usize)>,
) -> anyhow::Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut app = App::new(state, speech, guard.releases_reported())?;
    if let Some((section, lesson)) = start {
        app.open_lesson(section, lesson, Instant::now());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let reader = spawn_reader(tx);
    let mut display = Display::new();
    info!("player started");

    loop {
        app.draw(&mut display)?;
        let deadline = app.next_deadline();

        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if app.handle(event, Instant::now()) == Flow::Quit {
                    break;
                }
            }
            _ = app.rotation_changed() => {}
            _ = wait_until(deadline) => app.fire_animations(Instant::now()),
        }
    }

    drop(rx);
    let _ = reader.join();
    drop(guard);
    info!("player stopped");
    Ok(())
}
