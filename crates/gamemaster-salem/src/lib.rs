//! Salem 1692: settings, the conditional moderator script, and the roster
//! state machine (accusations, Tryal cards, night kills, win check).
//!
//! Only the setup, first night, day and end phases are walked as the primary
//! script. Night, conspiracy and death sequences are raised by the moderator
//! and played as subflows; see [`SalemEvent`].

pub mod domain;

pub use domain::phase::SalemPhase;
pub use domain::runtime::SalemRuntime;
pub use domain::script::{SalemEvent, event_steps, generate_script, primary_script};
pub use domain::settings::{SalemSettings, TryalCounts, tryal_card_counts, witch_count};
pub use domain::state::{NightResult, PlayerStatus, SalemGameState, Winner};
