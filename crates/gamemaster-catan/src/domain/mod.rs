//! Domain layer for Catan.

pub mod dice;
pub mod runtime;
pub mod script;
pub mod settings;
pub mod strings;
