//! Telemetry session
//!
//! Ties the serial link, link monitor and sample window to a display
//! surface.

pub mod controller;

pub use controller::{CycleReport, SessionController, BAR_BACK_ALPHA, VALUE_TEXT_LEN};
