//! Backend library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
pub mod test_support;

pub use middleware::{Trace, TraceId, TRACE_ID_HEADER};
