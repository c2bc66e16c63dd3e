//! Inbound HTTP surface: handlers, session plumbing, and error mapping.

pub mod auth;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
pub use state::HttpState;
