//! Werewolf: settings, presets and the moderator script.
//!
//! Werewolf has no embedded state machine; the moderator walks the generated
//! night/day checklist and keeps track of the table by hand.

pub mod domain;

pub use domain::script::generate_script;
pub use domain::settings::WerewolfSettings;
