//! Integration test utilities for the gateway client
//!
//! Provides a scripted mock gateway and a mock REST API so the client can be exercised
//! end to end over real sockets.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
