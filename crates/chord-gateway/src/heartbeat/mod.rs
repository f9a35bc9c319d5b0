//! Heartbeat keep-alive
//!
//! Sends op 1 on the interval announced by Hello until the connection goes away.

mod driver;
mod stats;

pub use driver::{HeartbeatDriver, HeartbeatError};
pub use stats::HeartbeatStats;
