pub mod eventbus;
pub mod service;
