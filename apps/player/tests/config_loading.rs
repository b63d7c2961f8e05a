mod common;

use common::TestContext;
use lesson_core::{ReselectPolicy, StageKind};
use lesson_player::commands::{list_lessons, load_catalog, new_session, stage_factories};
use lesson_player::config::{PlayerConfig, PlayerConfigError};
use pretty_assertions::assert_eq;

#[test]
fn test_missing_config_file_gives_defaults() {
    let ctx = TestContext::new(&[1]);
    let config = PlayerConfig::load_from_dir(ctx.dir()).unwrap();
    assert_eq!(config, PlayerConfig::default());
}

#[test]
fn test_config_file_is_read() {
    let ctx = TestContext::new(&[1]);
    ctx.write_file(
        "config.json",
        r#"{"animationMs": 900, "speechVoices": ["Anna"], "engine": {"reselect": "switch"}}"#,
    );

    let config = PlayerConfig::load_from_dir(ctx.dir()).unwrap();
    assert_eq!(config.animation_ms, 900);
    assert_eq!(config.speech_voices, vec!["Anna".to_string()]);
    assert_eq!(config.engine.reselect, ReselectPolicy::Switch);
}

#[test]
fn test_broken_config_file_is_reported() {
    let ctx = TestContext::new(&[1]);
    let path = ctx.write_file("config.json", "{ nope");
    assert!(matches!(
        PlayerConfig::load_from_file(&path),
        Err(PlayerConfigError::Parse { .. })
    ));
}

#[test]
fn test_catalog_lists_lessons_in_order() {
    let ctx = TestContext::new(&[7, 0, 3]);
    let lessons = list_lessons(&ctx.state.catalog);

    assert_eq!(lessons.len(), 3);
    assert_eq!(
        lessons.iter().map(|l| (l.section_index, l.lesson_index, l.word_count)).collect::<Vec<_>>(),
        vec![(0, 0, 7), (0, 1, 0), (0, 2, 3)]
    );
    assert_eq!(lessons[2].section_title, "Basics");
}

#[test]
fn test_catalog_with_duplicate_words_is_rejected() {
    let ctx = TestContext::new(&[1]);
    let path = ctx.write_file(
        "dupes.json",
        r#"[{"title": "S", "lessons": [{"title": "L", "desc": "", "words": [{"word": "a", "desc": "x"}, {"word": "a", "desc": "y"}]}]}]"#,
    );
    let err = load_catalog(&path).unwrap_err();
    assert!(err.message.contains("duplicate word"));
}

#[test]
fn test_only_bundled_stages_can_be_played() {
    assert_eq!(stage_factories(&[StageKind::Match]).unwrap().len(), 1);
    let Err(err) = stage_factories(&[StageKind::Match, StageKind::TranslationPuzzle]) else {
        panic!("translation puzzle should not be playable");
    };
    assert!(err.message.contains("translation_puzzle"));
}

#[test]
fn test_session_uses_configured_stages() {
    let ctx = TestContext::new(&[2]);
    let session = new_session(
        &ctx.state,
        lesson_core::KeyboardHub::new(),
        std::sync::Arc::new(lesson_core::Silent),
    )
    .unwrap();
    assert_eq!(session.stage_count(), 1);
}
