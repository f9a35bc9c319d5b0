//! REST API
//!
//! The one HTTP call the bot makes: posting a chat message.

mod client;
mod error;

pub use client::RestClient;
pub use error::RestError;
