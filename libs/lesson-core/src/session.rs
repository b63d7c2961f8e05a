//! Lesson session orchestration.
//!
//! A session plays the configured stages of one lesson in order. Exactly one
//! stage is alive at a time; when the last one clears, a history entry is
//! written once and the session shows its completion view.

use crate::config::EngineConfig;
use crate::error::{HistoryError, SessionError};
use crate::history::SharedHistory;
use crate::lessons::LessonLookup;
use crate::shortcuts::KeyboardHub;
use crate::speech::SpeechSynthesizer;
use crate::stage::{on_clear_channel, BoardView, ClearWatch, Stage, StageContext, StageFactory, StageInput};
use crate::types::{CardTarget, HistoryEntry, Lesson, StageKind};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Collaborators a session talks to.
pub struct SessionDeps {
    pub lookup: Arc<dyn LessonLookup>,
    pub history: SharedHistory,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub keyboard: KeyboardHub,
}

/// What the host should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    /// No lesson loaded.
    Idle,
    /// The requested lesson does not exist.
    NotFound { section: usize, lesson: usize },
    Playing {
        lesson: Arc<Lesson>,
        stage: usize,
        stage_count: usize,
        kind: StageKind,
    },
    Completed { entry: HistoryEntry },
}

struct Play {
    lesson: Arc<Lesson>,
    section: usize,
    lesson_index: usize,
    stage: usize,
    active: Option<(Box<dyn Stage>, ClearWatch)>,
}

enum State {
    Idle,
    NotFound { section: usize, lesson: usize },
    Playing(Play),
    Completed(HistoryEntry),
}

/// Orchestrates the stages of one lesson attempt.
pub struct LessonSession {
    id: Uuid,
    deps: SessionDeps,
    factories: Vec<Box<dyn StageFactory>>,
    config: EngineConfig,
    state: State,
}

impl LessonSession {
    /// Create an idle session. `factories` are played in order.
    pub fn new(deps: SessionDeps, factories: Vec<Box<dyn StageFactory>>, config: EngineConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            deps,
            factories,
            config,
            state: State::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage_count(&self) -> usize {
        self.factories.len()
    }

    /// Load a lesson and start its first stage. Any stage in progress is
    /// torn down first.
    pub fn load(&mut self, section: usize, lesson: usize) -> Result<(), SessionError> {
        self.state = State::Idle;
        self.id = Uuid::new_v4();

        match self.deps.lookup.resolve(section, lesson) {
            Ok(found) => {
                info!(session = %self.id, section, lesson, title = %found.title, "lesson loaded");
                self.state = State::Playing(Play {
                    lesson: found,
                    section,
                    lesson_index: lesson,
                    stage: 0,
                    active: None,
                });
                self.start_stage();
                self.settle()
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "lesson not found");
                self.state = State::NotFound { section, lesson };
                Ok(())
            }
        }
    }

    /// Leave the current lesson without recording anything.
    pub fn leave(&mut self) {
        if let State::Playing(play) = &self.state {
            info!(session = %self.id, stage = play.stage, "lesson left");
        }
        self.state = State::Idle;
    }

    pub fn click(&mut self, target: CardTarget) -> Result<(), SessionError> {
        self.dispatch(StageInput::Click(target))
    }

    /// Deliver a key-up through the keyboard hub to whichever binding is live.
    pub fn key_up(&mut self, key: char) -> Result<(), SessionError> {
        if !self.deps.keyboard.key_up(key) {
            return Ok(());
        }
        self.dispatch(StageInput::ShortcutsPending)
    }

    pub fn animation_end(&mut self, target: CardTarget) -> Result<(), SessionError> {
        self.dispatch(StageInput::AnimationEnd(target))
    }

    pub fn view(&self) -> SessionView {
        match &self.state {
            State::Idle => SessionView::Idle,
            State::NotFound { section, lesson } => SessionView::NotFound {
                section: *section,
                lesson: *lesson,
            },
            State::Playing(play) => SessionView::Playing {
                lesson: play.lesson.clone(),
                stage: play.stage,
                stage_count: self.factories.len(),
                kind: self.factories[play.stage].kind(),
            },
            State::Completed(entry) => SessionView::Completed {
                entry: entry.clone(),
            },
        }
    }

    /// Board of the active stage, if it shows one.
    pub fn board(&self) -> Option<BoardView> {
        match &self.state {
            State::Playing(Play {
                active: Some((stage, _)),
                ..
            }) => stage.board(),
            _ => None,
        }
    }

    fn dispatch(&mut self, input: StageInput) -> Result<(), SessionError> {
        if let State::Playing(Play {
            active: Some((stage, _)),
            ..
        }) = &mut self.state
        {
            stage.handle(input);
        }
        self.settle()
    }

    fn start_stage(&mut self) {
        let State::Playing(play) = &mut self.state else {
            return;
        };
        let Some(factory) = self.factories.get(play.stage) else {
            return;
        };

        let (on_clear, watch) = on_clear_channel();
        let context = StageContext {
            lesson: play.lesson.clone(),
            on_clear,
            keyboard: self.deps.keyboard.clone(),
            speech: self.deps.speech.clone(),
            config: self.config.clone(),
        };
        info!(session = %self.id, stage = play.stage, kind = factory.kind().as_str(), "stage started");
        play.active = Some((factory.build(context), watch));
    }

    /// Advance past every stage that has signalled completion and record the
    /// lesson once the last one is done.
    fn settle(&mut self) -> Result<(), SessionError> {
        loop {
            let State::Playing(play) = &mut self.state else {
                return Ok(());
            };

            let cleared = match play.active.as_mut() {
                Some((_, watch)) => watch.is_cleared(),
                // Only reachable with no stages configured.
                None => true,
            };
            if !cleared {
                return Ok(());
            }

            // Drop the finished stage before the next one binds its input.
            play.active = None;
            play.stage += 1;
            if play.stage < self.factories.len() {
                self.start_stage();
                continue;
            }

            let entry = HistoryEntry::new(&play.lesson, play.section, play.lesson_index, Utc::now());
            self.state = State::Completed(entry.clone());
            return self.record(entry);
        }
    }

    fn record(&self, entry: HistoryEntry) -> Result<(), SessionError> {
        let mut history = self
            .deps
            .history
            .lock()
            .map_err(|_| HistoryError::Poisoned)?;
        history.add(entry)?;
        info!(session = %self.id, "lesson completed");
        Ok(())
    }
}
