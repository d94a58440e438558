//! Shared test helpers for console integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gamemaster_catan::application::spinner::SpinSettings;
use gamemaster_core::clock::Clock;
use gamemaster_core::game::GameId;
use gamemaster_core::rng::DeterministicRng;
use gamemaster_engine::config::EngineConfig;
use gamemaster_engine::console::{ModeratorConsole, Progress};
use gamemaster_engine::games::default_settings;
use gamemaster_session::domain::repository::SessionStore;
use gamemaster_session::infrastructure::memory::InMemorySessionStore;
use gamemaster_test_support::{FixedClock, SequenceRng, fixed_now};

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

/// Fast dice animation: one frame, then the settled roll.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        dice_spin: SpinSettings {
            period: Duration::from_millis(1),
            frames: 1,
        },
        ..EngineConfig::default()
    }
}

/// Console over a fresh in-memory store with no scripted dice.
pub fn build_console() -> ModeratorConsole {
    build_console_with_rng(SequenceRng::new(vec![]))
}

/// Console whose dice come from `rng`. With [`test_config`] every roll
/// consumes four values: two animation faces, then the two settled faces.
pub fn build_console_with_rng(rng: SequenceRng) -> ModeratorConsole {
    build_console_on(Arc::new(InMemorySessionStore::new()), rng)
}

pub fn build_console_on(store: Arc<dyn SessionStore>, rng: SequenceRng) -> ModeratorConsole {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    ModeratorConsole::new(store, fixed_clock(), rng, test_config())
}

/// Starts `game_id` with its default settings.
pub async fn start_default(console: &mut ModeratorConsole, game_id: GameId) {
    let settings = default_settings(game_id).unwrap();
    console.start(game_id, settings).await.unwrap();
}

/// Advances until something other than a plain move happens.
pub async fn advance_until_stopped(console: &mut ModeratorConsole) -> Progress {
    loop {
        let progress = console.advance().await.unwrap();
        if progress != Progress::Moved {
            return progress;
        }
    }
}
