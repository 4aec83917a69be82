//! Link monitor implementation
//!
//! Tracks silence on the serial link. Any received frame resets the silence
//! counter; one second without frames while connected flips the link to
//! disconnected.

/// Silence after which a connected link counts as lost
pub const LINK_TIMEOUT_MS: u32 = 1000;

/// Link condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Connected,
    Disconnected,
}

/// Edge reported by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTransition {
    /// First frame after a disconnect
    Reconnected,
    /// Silence crossed the timeout
    Disconnected,
}

/// Staleness tracker for the telemetry link
///
/// Starts disconnected: nothing has been heard yet.
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: LinkState,
    /// Time since the last frame (ms)
    silence_ms: u32,
    timeout_ms: u32,
    /// Disconnect transitions so far
    disconnects: u32,
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new(LINK_TIMEOUT_MS)
    }
}

impl LinkMonitor {
    /// Create a monitor in the disconnected state
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            state: LinkState::Disconnected,
            silence_ms: 0,
            timeout_ms,
            disconnects: 0,
        }
    }

    /// Record a received frame
    ///
    /// Returns [`LinkTransition::Reconnected`] if the link was down.
    pub fn on_activity(&mut self) -> Option<LinkTransition> {
        self.silence_ms = 0;
        match self.state {
            LinkState::Connected => None,
            LinkState::Disconnected => {
                self.state = LinkState::Connected;
                Some(LinkTransition::Reconnected)
            }
        }
    }

    /// Advance time with no frame received
    ///
    /// Returns [`LinkTransition::Disconnected`] exactly once per outage.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<LinkTransition> {
        self.silence_ms = self.silence_ms.saturating_add(elapsed_ms);

        if self.state == LinkState::Connected && self.silence_ms >= self.timeout_ms {
            self.state = LinkState::Disconnected;
            self.disconnects = self.disconnects.saturating_add(1);
            return Some(LinkTransition::Disconnected);
        }
        None
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn silence_ms(&self) -> u32 {
        self.silence_ms
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Number of outages seen
    pub fn disconnects(&self) -> u32 {
        self.disconnects
    }
}
