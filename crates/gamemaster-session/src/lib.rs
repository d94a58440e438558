//! Game master assistant sessions and navigation.
//!
//! Responsible for storing moderator sessions, moving the progress pointer
//! through a generated script, splicing in temporary subflows, and exporting
//! a session as a structured document.

pub mod application;
pub mod domain;
pub mod infrastructure;
