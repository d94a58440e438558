//! Domain layer for Werewolf.

pub mod script;
pub mod settings;
pub mod strings;
