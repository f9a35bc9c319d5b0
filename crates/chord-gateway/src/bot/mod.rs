//! Text-command bot
//!
//! Answers `<prefix>ping` with `Pong!`, driven by a session's receive loop.

mod event_loop;
mod ping;

pub use event_loop::{run_event_loop, LoopExit};
pub use ping::{PingBot, Reply};
