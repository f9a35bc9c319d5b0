//! # chord-core
//!
//! Value objects shared by every crate in the workspace: Discord snowflake IDs and the
//! gateway intent set. No I/O lives here.

pub mod value_objects;

// Re-export commonly used types at crate root
pub use value_objects::{Intents, IntentsParseError, Snowflake, SnowflakeParseError};
