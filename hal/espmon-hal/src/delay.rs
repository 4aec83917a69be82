//! Delay helpers

use embedded_hal::delay::DelayNs;

/// Delay that returns immediately
///
/// Used where retry pacing is meaningless: host tests and the simulated link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
