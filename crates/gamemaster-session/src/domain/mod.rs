//! Session domain model and navigation state machines.

pub mod commands;
pub mod mutations;
pub mod progression;
pub mod repository;
pub mod session;
pub mod subflow;
