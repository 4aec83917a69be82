//! Configuration
//!
//! Session tunables and a loader for the small TOML file boards embed.

pub mod parse;
pub mod types;

pub use parse::parse_session_config;
pub use types::*;
