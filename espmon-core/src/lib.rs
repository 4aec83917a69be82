//! Board-agnostic session logic for the telemetry display
//!
//! This crate contains everything between the serial codec and the pixels:
//!
//! - Link health tracking (stale link → disconnected overlay)
//! - Sample windowing and the rolling history series
//! - The per-tick session controller
//! - Traits for the display surface and the page-advance input
//! - Configuration types and their TOML loader

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod aggregate;
pub mod channel;
pub mod config;
pub mod link;
pub mod session;
pub mod traits;

pub use channel::{Channel, Group, Reading};
