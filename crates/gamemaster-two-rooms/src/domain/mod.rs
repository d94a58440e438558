pub mod roles;
pub mod runtime;
pub mod script;
pub mod settings;
pub mod strings;
pub mod timer;
