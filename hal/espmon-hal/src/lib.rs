//! EspMon Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware seams the telemetry core talks
//! through. Board firmware provides the implementations; host tests use the
//! in-memory ones shipped here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  espmon-core (session controller)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  espmon-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  IoTransport  │       │BufferTransport│
//! │ (UART, board) │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::Transport`] - byte-oriented serial link
//! - [`gpio::InputPin`] - digital input (page-advance button)

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod delay;
pub mod gpio;
pub mod io;
pub mod uart;

// Re-export key types at crate root for convenience
pub use buffer::BufferTransport;
pub use delay::NoopDelay;
pub use gpio::InputPin;
pub use io::IoTransport;
pub use uart::{Transport, TransportError};
