//! Game master assistant composition root.
//!
//! Wires the per-game script factories and runtimes to the session store and
//! navigation state machines, and exposes a single moderator console that
//! drives one active session at a time.

pub mod config;
pub mod console;
pub mod games;
pub mod observability;
pub mod runtime;
