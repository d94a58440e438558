//! Two Rooms and a Boom: settings and presets, the moderator script, and
//! the round timer that runs alongside navigation.

pub mod application;
pub mod domain;

pub use application::countdown::Countdown;
pub use domain::runtime::TwoRoomsRuntime;
pub use domain::script::generate_script;
pub use domain::settings::{GamePreset, TwoRoomsSettings};
pub use domain::timer::{RoundTimer, SharedTimer, TimerColor, TimerSignal};
