//! Shared test mocks and utilities for the game master assistant.

mod clock;
mod rng;
mod store;

pub use clock::{FixedClock, fixed_now};
pub use rng::{MockRng, SequenceRng};
pub use store::FailingSessionStore;
