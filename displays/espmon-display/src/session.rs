//! Widget state for the telemetry screen
//!
//! [`DisplaySession`] is the single owner of everything the screen shows.
//! The session controller writes to it through `DisplaySurface`; the
//! renderer reads it back.

use heapless::String;

use espmon_core::aggregate::{History, HISTORY_LEN};
use espmon_core::traits::{DisplaySurface, WidgetColors, WidgetId};
use espmon_core::{Channel, Group};
use espmon_protocol::Rgba;

/// Panels taller than this have room for the history graph
pub const HISTORY_MIN_HEIGHT: u32 = 129;

/// Maximum label text length
pub const LABEL_TEXT_LEN: usize = 12;

/// Overlay text shown while the link is down
pub const DISCONNECTED_TEXT: &str = "[ disconnected ]";

/// Text widget
#[derive(Debug, Clone, PartialEq)]
pub struct LabelState {
    pub text: String<LABEL_TEXT_LEN>,
    pub colors: WidgetColors,
    pub visible: bool,
}

impl Default for LabelState {
    fn default() -> Self {
        Self {
            text: String::new(),
            colors: WidgetColors::solid(Rgba::WHITE),
            visible: true,
        }
    }
}

impl LabelState {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
    }
}

/// Bar widget
#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    /// Fill fraction, 0.0 to 1.0
    pub value: f32,
    pub colors: WidgetColors,
    pub gradient: bool,
    pub visible: bool,
}

impl Default for BarState {
    fn default() -> Self {
        Self {
            value: 0.0,
            colors: WidgetColors::new(Rgba::WHITE, Rgba::WHITE.with_alpha(64)),
            gradient: false,
            visible: true,
        }
    }
}

/// All widget state of the telemetry screen
#[derive(Debug, Clone)]
pub struct DisplaySession {
    titles: [LabelState; 2],
    values: [LabelState; 4],
    bars: [BarState; 4],
    history: History<HISTORY_LEN>,
    history_enabled: bool,
    history_visible: bool,
    overlay_visible: bool,
    dirty: bool,
}

impl DisplaySession {
    /// Create a session; `history` enables the graph widget
    pub fn new(history: bool) -> Self {
        Self {
            titles: core::array::from_fn(|_| LabelState::default()),
            values: core::array::from_fn(|_| LabelState::default()),
            bars: core::array::from_fn(|_| BarState::default()),
            history: History::new(),
            history_enabled: history,
            history_visible: true,
            overlay_visible: true,
            dirty: true,
        }
    }

    /// Session sized for a panel `height` pixels tall
    pub fn for_height(height: u32) -> Self {
        Self::new(height >= HISTORY_MIN_HEIGHT)
    }

    pub fn title(&self, group: Group) -> &LabelState {
        &self.titles[group_index(group)]
    }

    pub fn value(&self, channel: Channel) -> &LabelState {
        &self.values[channel.index()]
    }

    pub fn bar(&self, channel: Channel) -> &BarState {
        &self.bars[channel.index()]
    }

    pub fn history(&self) -> &History<HISTORY_LEN> {
        &self.history
    }

    /// Graph is present and not hidden
    pub fn history_shown(&self) -> bool {
        self.history_enabled && self.history_visible
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Check if the screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mark screen as dirty (needs redraw)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn label_mut(&mut self, id: WidgetId) -> Option<&mut LabelState> {
        match id {
            WidgetId::Title(group) => Some(&mut self.titles[group_index(group)]),
            WidgetId::Value(channel) => Some(&mut self.values[channel.index()]),
            _ => None,
        }
    }
}

fn group_index(group: Group) -> usize {
    match group {
        Group::Top => 0,
        Group::Bottom => 1,
    }
}

impl DisplaySurface for DisplaySession {
    fn apply_label(&mut self, id: WidgetId, text: &str) {
        if let Some(label) = self.label_mut(id) {
            label.set_text(text);
            self.dirty = true;
        }
    }

    fn apply_bar(&mut self, channel: Channel, value: f32) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.bars[channel.index()].value = value;
        self.dirty = true;
    }

    fn apply_colors(&mut self, id: WidgetId, colors: WidgetColors) {
        match id {
            WidgetId::Bar(channel) => self.bars[channel.index()].colors = colors,
            other => match self.label_mut(other) {
                Some(label) => label.colors = colors,
                None => return,
            },
        }
        self.dirty = true;
    }

    fn apply_gradient(&mut self, channel: Channel, enabled: bool) {
        self.bars[channel.index()].gradient = enabled;
        self.dirty = true;
    }

    fn set_visible(&mut self, id: WidgetId, visible: bool) {
        match id {
            WidgetId::Title(_) | WidgetId::Value(_) => {
                if let Some(label) = self.label_mut(id) {
                    label.visible = visible;
                }
            }
            WidgetId::Bar(channel) => self.bars[channel.index()].visible = visible,
            WidgetId::History => self.history_visible = visible,
            WidgetId::Disconnected => self.overlay_visible = visible,
        }
        self.dirty = true;
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }

    fn has_history(&self) -> bool {
        self.history_enabled
    }

    fn history_set_line(&mut self, channel: Channel, color: Rgba) {
        self.history.set_line(channel, color);
        self.dirty = true;
    }

    fn history_push(&mut self, channel: Channel, level: u8) {
        if self.history_enabled {
            self.history.push(channel, level);
            self.dirty = true;
        }
    }

    fn history_clear(&mut self) {
        self.history.clear();
        self.dirty = true;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplaySession {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DisplaySession[");
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", value.text.as_str());
        }
        defmt::write!(f, "; overlay={}]", self.overlay_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_state() {
        let session = DisplaySession::new(false);
        assert!(session.overlay_visible());
        assert!(session.is_dirty());
        assert!(!session.has_history());
        assert_eq!(session.value(Channel::Top1).text.as_str(), "");
    }

    #[test]
    fn test_history_by_height() {
        assert!(!DisplaySession::for_height(64).has_history());
        assert!(!DisplaySession::for_height(128).has_history());
        assert!(DisplaySession::for_height(240).has_history());
    }

    #[test]
    fn test_label_text_is_bounded() {
        let mut session = DisplaySession::new(false);
        session.apply_label(WidgetId::Title(Group::Top), "A very long title");
        assert_eq!(session.title(Group::Top).text.as_str(), "A very long ");
    }

    #[test]
    fn test_bar_value_clamped() {
        let mut session = DisplaySession::new(false);
        session.apply_bar(Channel::Top2, 3.0);
        assert_eq!(session.bar(Channel::Top2).value, 1.0);
        session.apply_bar(Channel::Top2, f32::NAN);
        assert_eq!(session.bar(Channel::Top2).value, 0.0);
    }

    #[test]
    fn test_colors_routed_by_widget() {
        let mut session = DisplaySession::new(false);
        let green = WidgetColors::new(Rgba::new(0, 255, 0, 255), Rgba::new(0, 255, 0, 64));
        session.apply_colors(WidgetId::Bar(Channel::Bottom1), green);
        session.apply_colors(WidgetId::Title(Group::Bottom), WidgetColors::solid(Rgba::BLACK));

        assert_eq!(session.bar(Channel::Bottom1).colors, green);
        assert_eq!(session.title(Group::Bottom).colors.foreground, Rgba::BLACK);
        assert_eq!(session.bar(Channel::Top1).colors, BarState::default().colors);
    }

    #[test]
    fn test_history_ignored_without_graph() {
        let mut session = DisplaySession::new(false);
        session.history_push(Channel::Top1, 10);
        assert!(session.history().is_empty());

        let mut session = DisplaySession::new(true);
        session.history_push(Channel::Top1, 10);
        assert_eq!(session.history().series(Channel::Top1).latest(), Some(10));
    }

    #[test]
    fn test_clean_until_changed() {
        let mut session = DisplaySession::new(false);
        session.mark_clean();
        assert!(!session.is_dirty());
        session.set_visible(WidgetId::Disconnected, false);
        assert!(session.is_dirty());
        assert!(!session.overlay_visible());
    }
}
