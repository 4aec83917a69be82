//! EspMon Serial Telemetry Protocol
//!
//! This crate defines the byte protocol between the PC-side telemetry
//! producer and the display. The display polls; the producer answers.
//!
//! # Protocol Overview
//!
//! Requests (display → producer) are always two bytes:
//! ```text
//! ┌─────────┬────────────┐
//! │ COMMAND │ PAGE INDEX │
//! │ 1B (i8) │ 1B (u8)    │
//! └─────────┴────────────┘
//! ```
//!
//! Responses (producer → display) are one discriminator byte followed by a
//! fixed-size, packed, little-endian record:
//! ```text
//! ┌──────┬───────────────────────────────────────┐
//! │ 0x00 │ screen descriptor (74 bytes)          │
//! ├──────┼───────────────────────────────────────┤
//! │ 0x01 │ data sample (8 bytes)                 │
//! └──────┴───────────────────────────────────────┘
//! ```
//!
//! There is no start byte and no checksum. An unknown discriminator makes
//! the reader drop everything currently buffered and start over on the
//! next byte that arrives.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod link;
pub mod record;
pub mod request;
pub mod sim;

mod wire;

pub use frame::{Frame, FrameError, FrameKind, FrameReader, ReaderStats, MAX_FRAME_LEN};
pub use link::{RetryPolicy, SerialLink};
pub use record::{
    ChannelDescriptor, DataSample, GradientFlags, GroupDescriptor, Rgba, ScreenDescriptor,
    DATA_SAMPLE_LEN, LABEL_LEN, SCREEN_DESCRIPTOR_LEN, SUFFIX_LEN,
};
pub use request::{Request, REQUEST_LEN};
pub use sim::SimulatedLink;
