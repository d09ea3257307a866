pub mod api;
pub mod config;
pub mod import;
pub mod logging;
pub mod persistence;
