//! Game master core: shared script model and runtime abstractions.
//!
//! This crate defines the step/phase model every script factory produces,
//! the linearizer used to navigate a script, and the seams (clock, random
//! source, periodic ticker, runtime hooks) the rest of the workspace plugs
//! into. It contains no game-specific rules.

pub mod clock;
pub mod command;
pub mod error;
pub mod game;
pub mod linearizer;
pub mod rng;
pub mod script;
pub mod ticker;
pub mod transition;
