//! Display surface trait

use espmon_protocol::Rgba;

use crate::channel::{Channel, Group};

/// Addressable widgets of the telemetry screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetId {
    /// Group label ("CPU", "GPU")
    Title(Group),
    /// Formatted value text of a channel
    Value(Channel),
    /// Bar of a channel
    Bar(Channel),
    /// History graph
    History,
    /// "[ disconnected ]" overlay
    Disconnected,
}

/// Foreground/background pair for a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetColors {
    pub foreground: Rgba,
    pub background: Rgba,
}

impl WidgetColors {
    pub const fn new(foreground: Rgba, background: Rgba) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Foreground only, fully transparent background
    pub const fn solid(foreground: Rgba) -> Self {
        Self::new(foreground, foreground.with_alpha(0))
    }
}

/// Widget state the session controller writes to
///
/// Implementations own all widget state. Calls only record the new state;
/// pixels change when the owner renders after [`request_redraw`].
///
/// [`request_redraw`]: DisplaySurface::request_redraw
pub trait DisplaySurface {
    /// Set the text of a label widget
    fn apply_label(&mut self, id: WidgetId, text: &str);

    /// Set a bar's fill, 0.0 to 1.0
    fn apply_bar(&mut self, channel: Channel, value: f32);

    fn apply_colors(&mut self, id: WidgetId, colors: WidgetColors);

    /// Draw a channel's bar as a gradient
    fn apply_gradient(&mut self, channel: Channel, enabled: bool);

    fn set_visible(&mut self, id: WidgetId, visible: bool);

    /// Mark the screen for repainting; repeated calls are harmless
    fn request_redraw(&mut self);

    /// Whether this display has room for the history graph
    fn has_history(&self) -> bool {
        false
    }

    /// Set the color of a history line
    fn history_set_line(&mut self, _channel: Channel, _color: Rgba) {}

    /// Append a quantized point to a history line
    fn history_push(&mut self, _channel: Channel, _level: u8) {}

    /// Drop all history points
    fn history_clear(&mut self) {}
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn apply_label(&mut self, id: WidgetId, text: &str) {
        (**self).apply_label(id, text)
    }

    fn apply_bar(&mut self, channel: Channel, value: f32) {
        (**self).apply_bar(channel, value)
    }

    fn apply_colors(&mut self, id: WidgetId, colors: WidgetColors) {
        (**self).apply_colors(id, colors)
    }

    fn apply_gradient(&mut self, channel: Channel, enabled: bool) {
        (**self).apply_gradient(channel, enabled)
    }

    fn set_visible(&mut self, id: WidgetId, visible: bool) {
        (**self).set_visible(id, visible)
    }

    fn request_redraw(&mut self) {
        (**self).request_redraw()
    }

    fn has_history(&self) -> bool {
        (**self).has_history()
    }

    fn history_set_line(&mut self, channel: Channel, color: Rgba) {
        (**self).history_set_line(channel, color)
    }

    fn history_push(&mut self, channel: Channel, level: u8) {
        (**self).history_push(channel, level)
    }

    fn history_clear(&mut self) {
        (**self).history_clear()
    }
}
