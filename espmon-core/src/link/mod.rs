//! Link health
//!
//! Decides when the producer has gone quiet.

pub mod monitor;

pub use monitor::{LinkMonitor, LinkState, LinkTransition, LINK_TIMEOUT_MS};
