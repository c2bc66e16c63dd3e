//! Outbound adapters: concrete implementations of domain ports.

pub mod cache;
pub mod persistence;
