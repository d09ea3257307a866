//! Identity API client infrastructure.
//!
//! Resolves a bearer token to the account behind it via the remote REST API.

mod client;
mod config;

pub use client::{HttpIdentityClient, IdentityClient, IdentityClientHandle};
pub use config::ApiConfig;
