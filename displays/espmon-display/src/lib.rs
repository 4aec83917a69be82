//! Widget state and rendering for the telemetry display
//!
//! This crate provides:
//! - [`DisplaySession`]: owns every widget's state and implements the core's
//!   `DisplaySurface`, so the session controller never touches pixels
//! - [`render`]: paints a session onto any `embedded-graphics` draw target
//! - [`DisplayBackend`]: a panel that can be drawn on and flushed
//!
//! # Architecture
//!
//! ```text
//! SessionController ──apply_*──▶ DisplaySession ──render──▶ DisplayBackend
//!                                   (state)                  (framebuffer)
//!                                                              │ flush
//!                                                              ▼
//!                                                            panel
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod render;
pub mod session;

// Re-export key types
pub use backend::{present, DisplayBackend, DisplayError};
pub use render::{render, Layout, PaletteColor};
pub use session::{BarState, DisplaySession, LabelState, HISTORY_MIN_HEIGHT};
