//! Integration tests for plain checklist navigation (Werewolf).

mod common;

use gamemaster_core::game::GameId;
use gamemaster_core::linearizer::Pointer;
use gamemaster_core::error::DomainError;
use gamemaster_engine::console::Progress;
use gamemaster_session::domain::progression::BlockReason;

#[tokio::test]
async fn test_prep_phase_requires_confirmation_before_first_night() {
    // Arrange
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;

    // Act
    let stopped = common::advance_until_stopped(&mut console).await;
    let confirmed = console.confirm().await.unwrap();

    // Assert
    assert_eq!(
        stopped,
        Progress::Blocked {
            reason: BlockReason::RequiresConfirm
        }
    );
    assert_eq!(confirmed, Progress::Moved);
    let view = console.view().unwrap();
    assert_eq!(view.session.pointer, Pointer::new(1, 0));
    let current = view.current.unwrap();
    assert_eq!(current.phase_id, "night-1");
    assert_eq!(current.step.id, "night-1-sleep");
}

#[tokio::test]
async fn test_retreat_walks_back_across_phases() {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;
    console.jump_to(Pointer::new(1, 0)).await.unwrap();

    let progress = console.retreat().await.unwrap();

    assert_eq!(progress, Progress::Moved);
    let current = console.view().unwrap().current.unwrap();
    assert_eq!(current.step.id, "prep-check-ready");
}

#[tokio::test]
async fn test_retreat_at_first_step_is_unchanged() {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;

    assert_eq!(console.retreat().await.unwrap(), Progress::Unchanged);
}

#[tokio::test]
async fn test_skip_only_skippable_steps() {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;

    let on_first = console.skip().await;
    console.advance().await.unwrap();
    let on_explain = console.skip().await.unwrap();

    assert!(matches!(on_first, Err(DomainError::Validation(_))));
    assert_eq!(on_explain, Progress::Moved);
    let current = console.view().unwrap().current.unwrap();
    assert_eq!(current.step.id, "prep-explain-signals");
}

#[tokio::test]
async fn test_jump_to_phase_and_bad_pointer() {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;

    console.jump_to_phase("day-1").await.unwrap();
    let bad = console.jump_to(Pointer::new(0, 99)).await;
    let unknown = console.jump_to_phase("afternoon").await;

    assert_eq!(console.view().unwrap().current.unwrap().phase_id, "day-1");
    assert!(matches!(bad, Err(DomainError::InvalidPointer { .. })));
    assert!(matches!(unknown, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_notes_attach_to_current_step() {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Werewolf).await;
    console.advance().await.unwrap();

    let session = console
        .add_note("  Anna was late  ", Some("Anna".into()), vec!["table".into()])
        .await
        .unwrap();
    let blank = console.add_note("   ", None, Vec::new()).await;

    let note = &session.notes[0];
    assert_eq!(note.text, "Anna was late");
    assert_eq!(note.player_label.as_deref(), Some("Anna"));
    assert_eq!(note.context.step_id, "prep-explain-night");
    assert!(matches!(blank, Err(DomainError::Validation(_))));
}
