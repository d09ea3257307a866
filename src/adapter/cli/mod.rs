pub mod args;
pub mod commands;
pub mod error;
pub mod events;
pub mod prompt;
pub mod state;
