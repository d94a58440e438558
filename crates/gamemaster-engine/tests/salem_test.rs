//! Integration tests for Salem event subflows and the embedded state machine.

mod common;

use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_engine::console::{ModeratorConsole, Progress};
use gamemaster_engine::runtime::ActiveGame;
use gamemaster_salem::{SalemEvent, SalemPhase, SalemRuntime, Winner};
use gamemaster_session::domain::progression::BlockReason;

async fn console_at_day() -> ModeratorConsole {
    let mut console = common::build_console();
    common::start_default(&mut console, GameId::Salem).await;
    console.jump_to_phase("day").await.unwrap();
    console
}

fn salem(console: &ModeratorConsole) -> &SalemRuntime {
    match console.game() {
        Some(ActiveGame::Salem(runtime)) => runtime,
        other => panic!("expected a Salem session, got {other:?}"),
    }
}

#[tokio::test]
async fn test_night_subflow_leaves_primary_pointer_alone() {
    // Arrange
    let mut console = console_at_day().await;
    let pointer = console.view().unwrap().session.pointer;

    // Act
    let entered = console.raise_event(SalemEvent::Night).unwrap();
    let during = console.view().unwrap();

    // Assert
    assert_eq!(
        entered,
        Progress::SubflowEntered {
            label: SalemEvent::Night.label().into()
        }
    );
    assert_eq!(during.subflow.unwrap().label, "night");
    assert_eq!(during.session.pointer, pointer);
    assert_eq!(salem(&console).state().current_phase, SalemPhase::Night);
}

#[tokio::test]
async fn test_second_event_conflicts_with_active_one() {
    let mut console = console_at_day().await;
    console.raise_event(SalemEvent::Conspiracy).unwrap();

    let result = console.raise_event(SalemEvent::Night);

    assert!(matches!(result, Err(DomainError::SubflowConflict { ref active }) if active == "conspiracy"));
}

#[tokio::test]
async fn test_cancelled_night_returns_to_day_without_resolving() {
    let mut console = console_at_day().await;
    console
        .with_salem(|state| state.set_witch_target(2))
        .await
        .unwrap();
    console.raise_event(SalemEvent::Night).unwrap();

    let exited = console.exit_subflow().await.unwrap();

    assert_eq!(
        exited,
        Progress::SubflowExited {
            label: "night".into(),
            completed: false
        }
    );
    let runtime = salem(&console);
    assert!(runtime.last_dawn().is_none());
    assert_eq!(runtime.state().current_phase, SalemPhase::Day);
    assert_eq!(console.view().unwrap().current.unwrap().phase_id, "day");
}

#[tokio::test]
async fn test_conspiracy_completes_with_confirmation() {
    let mut console = console_at_day().await;
    console
        .with_salem(|state| state.set_black_cat_holder(1))
        .await
        .unwrap();
    console.raise_event(SalemEvent::Conspiracy).unwrap();

    let stopped = common::advance_until_stopped(&mut console).await;
    let exited = console.confirm().await.unwrap();

    assert_eq!(
        stopped,
        Progress::Blocked {
            reason: BlockReason::RequiresConfirm
        }
    );
    assert_eq!(
        exited,
        Progress::SubflowExited {
            label: "conspiracy".into(),
            completed: true
        }
    );
    let runtime = salem(&console);
    assert_eq!(runtime.last_conspiracy(), Some("Player 2"));
    assert_eq!(runtime.state().players[1].tryal_cards_revealed, 1);
}

#[tokio::test]
async fn test_revealed_witch_runs_death_sequence_then_ends_game() {
    // Arrange
    let mut console = console_at_day().await;

    // Act
    console
        .with_salem(|state| state.reveal_tryal_card(1, true))
        .await
        .unwrap();
    let in_death = console.view().unwrap();
    common::advance_until_stopped(&mut console).await;
    let exited = console.confirm().await.unwrap();

    // Assert
    assert_eq!(in_death.subflow.unwrap().label, "death");
    assert_eq!(
        exited,
        Progress::SubflowExited {
            label: "death".into(),
            completed: true
        }
    );
    let runtime = salem(&console);
    assert!(runtime.unannounced_deaths().is_empty());
    assert_eq!(runtime.winner(), Some(Winner::Town));
    assert_eq!(console.view().unwrap().current.unwrap().phase_id, "end");
}

#[tokio::test]
async fn test_state_action_errors_pass_through() {
    let mut console = console_at_day().await;

    let result = console.with_salem(|state| state.set_witch_target(42)).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert!(console.view().unwrap().subflow.is_none());
}
