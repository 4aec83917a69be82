//! Rolling history series
//!
//! One series per channel, each a FIFO of 8-bit levels. The series index is
//! the channel index; line colors follow the active page.

use heapless::Deque;

use espmon_protocol::Rgba;

use crate::channel::Channel;

/// Points kept per history line
pub const HISTORY_LEN: usize = 100;

/// FIFO of quantized values for one channel
#[derive(Debug, Clone, Default)]
pub struct HistorySeries<const CAP: usize> {
    points: Deque<u8, CAP>,
}

impl<const CAP: usize> HistorySeries<CAP> {
    pub const fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    /// Append a point, evicting the oldest at capacity
    pub fn push(&mut self, level: u8) {
        if CAP == 0 {
            return;
        }
        if self.points.is_full() {
            self.points.pop_front();
        }
        let _ = self.points.push_back(level);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.points.iter().copied()
    }

    pub fn latest(&self) -> Option<u8> {
        self.points.back().copied()
    }
}

/// The four channel lines of the history graph
#[derive(Debug, Clone)]
pub struct History<const CAP: usize> {
    series: [HistorySeries<CAP>; 4],
    colors: [Rgba; 4],
}

impl<const CAP: usize> Default for History<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> History<CAP> {
    /// Empty graph with white lines
    pub fn new() -> Self {
        Self {
            series: [
                HistorySeries::new(),
                HistorySeries::new(),
                HistorySeries::new(),
                HistorySeries::new(),
            ],
            colors: [Rgba::WHITE; 4],
        }
    }

    pub fn set_line(&mut self, channel: Channel, color: Rgba) {
        self.colors[channel.index()] = color;
    }

    pub fn push(&mut self, channel: Channel, level: u8) {
        self.series[channel.index()].push(level);
    }

    /// Drop all points; line colors are kept
    pub fn clear(&mut self) {
        for series in self.series.iter_mut() {
            series.clear();
        }
    }

    pub fn series(&self, channel: Channel) -> &HistorySeries<CAP> {
        &self.series[channel.index()]
    }

    pub fn color(&self, channel: Channel) -> Rgba {
        self.colors[channel.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(HistorySeries::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut series = HistorySeries::<3>::new();
        for level in 1..=4 {
            series.push(level);
        }
        assert_eq!(series.len(), 3);
        assert!(series.iter().eq([2, 3, 4]));
        assert_eq!(series.latest(), Some(4));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut history = History::<HISTORY_LEN>::new();
        history.push(Channel::Top1, 10);
        history.push(Channel::Bottom2, 20);
        history.push(Channel::Bottom2, 30);

        assert!(history.series(Channel::Top1).iter().eq([10]));
        assert!(history.series(Channel::Top2).is_empty());
        assert!(history.series(Channel::Bottom2).iter().eq([20, 30]));
    }

    #[test]
    fn test_clear_keeps_colors() {
        let mut history = History::<8>::new();
        assert_eq!(history.color(Channel::Top2), Rgba::WHITE);

        history.set_line(Channel::Top2, Rgba::new(255, 127, 0, 255));
        history.push(Channel::Top2, 1);
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.color(Channel::Top2), Rgba::new(255, 127, 0, 255));
    }
}
