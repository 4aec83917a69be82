//! Display backend trait
//!
//! A backend is a framebuffer the renderer draws into plus a way to push
//! that framebuffer to the panel.

use embedded_graphics::draw_target::DrawTarget;

use crate::render::{render, PaletteColor};
use crate::session::DisplaySession;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
    /// Drawing into the framebuffer failed
    Draw,
}

/// Panel with a local framebuffer
///
/// Drawing only touches the framebuffer; [`flush`](Self::flush) returns once
/// the panel shows it and the framebuffer may be modified again.
pub trait DisplayBackend: DrawTarget {
    /// Send the framebuffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Check if the display is ready
    fn is_ready(&self) -> bool {
        true
    }
}

/// Render and flush if the session changed
///
/// Returns whether a frame was pushed to the panel.
pub fn present<B>(session: &mut DisplaySession, backend: &mut B) -> Result<bool, DisplayError>
where
    B: DisplayBackend,
    B::Color: PaletteColor,
{
    if !session.is_dirty() {
        return Ok(false);
    }
    if !backend.is_ready() {
        return Err(DisplayError::NotInitialized);
    }

    render(session, backend).map_err(|_| DisplayError::Draw)?;
    backend.flush()?;
    session.mark_clean();
    Ok(true)
}
