//! Collaborator traits
//!
//! The session controller drives the screen and reads the page button only
//! through these.

pub mod display;
pub mod input;

pub use display::{DisplaySurface, WidgetColors, WidgetId};
pub use input::{ButtonInput, InputSource};
