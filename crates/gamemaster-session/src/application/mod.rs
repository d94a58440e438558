//! Application services: command handlers, queries and export/import.

pub mod command_handlers;
pub mod export;
pub mod query_handlers;
