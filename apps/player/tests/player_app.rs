mod common;

use std::sync::Arc;
use std::time::Duration;

use common::TestContext;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lesson_core::{BoardView, CardStatus, CardTarget, SessionView, Silent};
use lesson_player::config::PlayerConfig;
use lesson_player::terminal::app::Screen;
use lesson_player::terminal::display::{BOARD_TOP, LEFT_X, ROW_HEIGHT};
use lesson_player::terminal::input::UiEvent;
use lesson_player::terminal::{App, Flow};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

fn key(code: KeyCode) -> UiEvent {
    UiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn app(ctx: TestContext) -> (App, TestContext) {
    // The app borrows nothing from the context; the context keeps the
    // scratch directory alive.
    let state = lesson_player::AppState {
        repository: ctx.state.repository.clone(),
        catalog: ctx.state.catalog.clone(),
        config: ctx.state.config.clone(),
    };
    (App::new(state, Arc::new(Silent), false).unwrap(), ctx)
}

fn board(app: &App) -> BoardView {
    app.session().board().expect("board on screen")
}

/// Shortcut key of the card at `target`.
fn shortcut(board: &BoardView, target: CardTarget) -> char {
    board.card(target).unwrap().shortcut.unwrap()
}

/// Right-column partner of the left card in `row`. Words `w{n}` pair with
/// descriptions `d{n}`.
fn partner(board: &BoardView, row: usize) -> CardTarget {
    let wanted = board.rows[row].left.label.replacen('w', "d", 1);
    board
        .rows
        .iter()
        .find(|r| r.right.label == wanted)
        .unwrap()
        .right
        .target
}

fn non_partner(board: &BoardView, row: usize) -> CardTarget {
    let wanted = board.rows[row].left.label.replacen('w', "d", 1);
    board
        .rows
        .iter()
        .find(|r| r.right.label != wanted && r.right.status != CardStatus::Correct)
        .unwrap()
        .right
        .target
}

#[tokio::test]
async fn test_starts_on_home_with_rotation() {
    let (app, _ctx) = app(TestContext::new(&[7, 0]));
    assert_eq!(app.screen(), Screen::Home);
    assert!(app.is_rotating());
    assert_eq!(app.session().view(), SessionView::Idle);
}

#[tokio::test]
async fn test_enter_opens_lesson_and_stops_rotation() {
    let (mut app, _ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();

    assert_eq!(app.handle(key(KeyCode::Enter), now), Flow::Continue);

    assert_eq!(app.screen(), Screen::Lesson);
    assert!(!app.is_rotating());
    let board = board(&app);
    assert_eq!((board.round, board.round_count), (0, 2));
    assert_eq!(board.rows.len(), 5);
}

#[tokio::test]
async fn test_playing_by_keyboard_completes_and_records() {
    let (mut app, ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();
    app.handle(key(KeyCode::Enter), now);

    while let Some(board) = app.session().board() {
        let row = board
            .rows
            .iter()
            .position(|r| r.left.status != CardStatus::Correct)
            .unwrap();
        let left = board.rows[row].left.target;
        let right = partner(&board, row);
        app.handle(key(KeyCode::Char(shortcut(&board, left))), now);
        app.handle(key(KeyCode::Char(shortcut(&board, right))), now);
    }

    assert!(matches!(app.session().view(), SessionView::Completed { .. }));
    let history = ctx.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].lesson_title, "Lesson 0");

    app.handle(key(KeyCode::Enter), now);
    assert_eq!(app.screen(), Screen::Home);
    assert!(app.is_rotating());
}

#[tokio::test]
async fn test_mismatch_feedback_clears_after_the_animation() {
    let config = PlayerConfig {
        animation_ms: 300,
        ..PlayerConfig::default()
    };
    let (mut app, _ctx) = app(TestContext::with_config(&[7, 0], config));
    let now = Instant::now();
    app.handle(key(KeyCode::Enter), now);

    let first = board(&app);
    let left = first.rows[0].left.target;
    let wrong = non_partner(&first, 0);
    app.handle(key(KeyCode::Char(shortcut(&first, left))), now);
    app.handle(key(KeyCode::Char(shortcut(&first, wrong))), now);

    let after = board(&app);
    assert_eq!(after.card(left).unwrap().status, CardStatus::Incorrect);
    assert_eq!(app.next_deadline(), Some(now + Duration::from_millis(300)));

    // Nothing happens before the deadline.
    app.fire_animations(now + Duration::from_millis(100));
    assert_eq!(board(&app).card(left).unwrap().status, CardStatus::Incorrect);

    app.fire_animations(now + Duration::from_millis(300));
    let cleared = board(&app);
    assert_eq!(cleared.card(left).unwrap().status, CardStatus::None);
    assert_eq!(cleared.card(wrong).unwrap().status, CardStatus::None);
    assert_eq!(app.pending_animations(), 0);
}

/// A wrong right-column card for the left card in `row` that is free to pick.
fn free_non_partner(board: &BoardView, row: usize) -> CardTarget {
    let wanted = board.rows[row].left.label.replacen('w', "d", 1);
    board
        .rows
        .iter()
        .find(|r| r.right.label != wanted && r.right.status == CardStatus::None)
        .unwrap()
        .right
        .target
}

fn mismatch(app: &mut App, row: usize, now: Instant) {
    let board = board(app);
    let left = board.rows[row].left.target;
    let wrong = free_non_partner(&board, row);
    app.handle(key(KeyCode::Char(shortcut(&board, left))), now);
    app.handle(key(KeyCode::Char(shortcut(&board, wrong))), now);
}

#[tokio::test]
async fn test_repeated_mismatch_holds_its_own_feedback() {
    let config = PlayerConfig {
        animation_ms: 600,
        ..PlayerConfig::default()
    };
    let (mut app, _ctx) = app(TestContext::with_config(&[7, 0], config));
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    app.handle(key(KeyCode::Enter), t0);

    mismatch(&mut app, 0, t0);
    mismatch(&mut app, 1, t0 + ms(100));
    mismatch(&mut app, 0, t0 + ms(200));
    assert_eq!(board(&app).card(CardTarget::left(0)).unwrap().status, CardStatus::Incorrect);

    app.fire_animations(t0 + ms(600));
    assert_eq!(board(&app).card(CardTarget::left(0)).unwrap().status, CardStatus::Incorrect);

    app.fire_animations(t0 + ms(800));
    assert_eq!(board(&app).card(CardTarget::left(0)).unwrap().status, CardStatus::None);
    assert_eq!(app.pending_animations(), 0);
}

#[tokio::test]
async fn test_modified_letters_are_not_shortcuts() {
    let (mut app, _ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();
    app.handle(key(KeyCode::Enter), now);

    let target = CardTarget::left(1);
    let letter = shortcut(&board(&app), target);
    for modifiers in [KeyModifiers::ALT, KeyModifiers::CONTROL] {
        app.handle(UiEvent::Key(KeyEvent::new(KeyCode::Char(letter), modifiers)), now);
        assert_eq!(board(&app).card(target).unwrap().status, CardStatus::None);
    }

    app.handle(key(KeyCode::Char(letter)), now);
    assert_eq!(board(&app).card(target).unwrap().status, CardStatus::Selected);
}

#[tokio::test]
async fn test_click_selects_card_under_pointer() {
    let (mut app, _ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();
    app.handle(key(KeyCode::Enter), now);

    app.handle(
        UiEvent::Click {
            column: LEFT_X + 1,
            row: BOARD_TOP + ROW_HEIGHT,
        },
        now,
    );

    assert_eq!(
        board(&app).card(CardTarget::left(1)).unwrap().status,
        CardStatus::Selected
    );
}

#[tokio::test]
async fn test_escape_leaves_without_recording() {
    let (mut app, ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();
    app.handle(key(KeyCode::Enter), now);
    app.handle(key(KeyCode::Char('q')), now);

    app.handle(key(KeyCode::Esc), now);

    assert_eq!(app.screen(), Screen::Home);
    assert_eq!(app.session().view(), SessionView::Idle);
    assert_eq!(app.pending_animations(), 0);
    assert!(ctx.history().is_empty());
}

#[tokio::test]
async fn test_empty_lesson_completes_immediately() {
    let (mut app, ctx) = app(TestContext::new(&[7, 0]));
    let now = Instant::now();
    app.handle(key(KeyCode::Down), now);
    assert_eq!(app.cursor(), 1);

    app.handle(key(KeyCode::Enter), now);

    assert!(matches!(app.session().view(), SessionView::Completed { .. }));
    assert_eq!(ctx.history().len(), 1);
}

#[tokio::test]
async fn test_unknown_lesson_shows_not_found() {
    let (mut app, _ctx) = app(TestContext::new(&[7]));
    app.open_lesson(4, 0, Instant::now());
    assert_eq!(app.session().view(), SessionView::NotFound { section: 4, lesson: 0 });
}

#[tokio::test]
async fn test_history_reset_from_the_history_screen() {
    let (mut app, ctx) = app(TestContext::new(&[7]));
    ctx.seed_history(&[common::fixtures::history_entry("done", 3)]);
    let now = Instant::now();

    app.handle(key(KeyCode::Char('h')), now);
    assert_eq!(app.screen(), Screen::History);

    app.handle(key(KeyCode::Char('r')), now);
    assert_eq!(app.screen(), Screen::ConfirmReset);
    app.handle(key(KeyCode::Char('n')), now);
    assert_eq!(app.notice(), Some("Reset cancelled"));
    assert_eq!(ctx.history().len(), 1);

    app.handle(key(KeyCode::Char('r')), now);
    app.handle(key(KeyCode::Char('y')), now);
    assert_eq!(app.notice(), Some("History reset"));
    assert!(ctx.history().is_empty());
}

#[tokio::test]
async fn test_ctrl_c_quits_from_anywhere() {
    let (mut app, _ctx) = app(TestContext::new(&[7]));
    app.handle(key(KeyCode::Enter), Instant::now());
    let ctrl_c = UiEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(app.handle(ctrl_c, Instant::now()), Flow::Quit);
}
