//! Catan: settings, the moderator script, the robber subflow, and the dice
//! state machine that runs alongside navigation.

pub mod application;
pub mod domain;

pub use domain::dice::{EventDie, RollResult, roll_dice};
pub use domain::runtime::CatanRuntime;
pub use domain::script::{generate_script, robber_subflow};
pub use domain::settings::CatanSettings;
