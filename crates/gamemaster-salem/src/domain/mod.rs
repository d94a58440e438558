pub mod phase;
pub mod runtime;
pub mod script;
pub mod settings;
pub mod state;
pub mod strings;
