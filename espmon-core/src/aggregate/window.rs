//! Fixed-size averaging window

use crate::channel::Reading;

/// Readings averaged into one history point
pub const AVERAGE_WINDOW: usize = 5;

/// Ring of the last `N` readings with a batch counter
///
/// The ring keeps rolling; the counter decides when a new average is due.
#[derive(Debug, Clone)]
pub struct ReadingWindow<const N: usize> {
    slots: [Reading; N],
    /// Next slot to write
    index: usize,
    /// Insertions since the last drain, saturating at `N`
    pending: usize,
}

impl<const N: usize> Default for ReadingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadingWindow<N> {
    pub fn new() -> Self {
        Self {
            slots: [Reading::default(); N],
            index: 0,
            pending: 0,
        }
    }

    /// Store a reading, overwriting the oldest slot
    pub fn push(&mut self, reading: Reading) {
        if N == 0 {
            return;
        }
        self.slots[self.index] = reading;
        self.index = (self.index + 1) % N;
        self.pending = (self.pending + 1).min(N);
    }

    /// A full batch has arrived since the last drain
    pub fn ready(&self) -> bool {
        N > 0 && self.pending >= N
    }

    /// Element-wise mean of all slots, if a batch is ready
    ///
    /// Starts a new batch; the ring contents are kept.
    pub fn drain_average(&mut self) -> Option<Reading> {
        if !self.ready() {
            return None;
        }
        self.pending = 0;

        let mut sum = [0.0f32; 4];
        for slot in &self.slots {
            for (total, value) in sum.iter_mut().zip(slot.values()) {
                *total += value;
            }
        }
        Some(Reading::new(sum.map(|total| total / N as f32)))
    }

    /// Forget the current batch
    pub fn reset(&mut self) {
        self.index = 0;
        self.pending = 0;
    }

    /// Insertions counted toward the current batch
    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    #[test]
    fn test_ready_after_full_batch() {
        let mut window = ReadingWindow::<AVERAGE_WINDOW>::new();
        for _ in 0..AVERAGE_WINDOW - 1 {
            window.push(Reading::splat(0.5));
            assert!(!window.ready());
        }
        window.push(Reading::splat(0.5));
        assert!(window.ready());
        assert_eq!(window.drain_average(), Some(Reading::splat(0.5)));
        assert!(!window.ready());
        assert_eq!(window.drain_average(), None);
    }

    #[test]
    fn test_only_latest_batch_contributes() {
        let mut window = ReadingWindow::<4>::new();
        for _ in 0..4 {
            window.push(Reading::splat(1.0));
        }
        for _ in 0..4 {
            window.push(Reading::splat(0.0));
        }
        assert_eq!(window.drain_average(), Some(Reading::splat(0.0)));
    }

    #[test]
    fn test_mean_per_channel() {
        let mut window = ReadingWindow::<2>::new();
        window.push(Reading::new([0.0, 1.0, 0.25, 0.5]));
        window.push(Reading::new([1.0, 1.0, 0.75, 0.0]));
        let avg = window.drain_average().unwrap();
        assert_eq!(avg.get(Channel::Top1), 0.5);
        assert_eq!(avg.get(Channel::Top2), 1.0);
        assert_eq!(avg.get(Channel::Bottom1), 0.5);
        assert_eq!(avg.get(Channel::Bottom2), 0.25);
    }

    #[test]
    fn test_reset_discards_batch() {
        let mut window = ReadingWindow::<3>::new();
        window.push(Reading::splat(1.0));
        window.push(Reading::splat(1.0));
        window.reset();
        window.push(Reading::splat(1.0));
        assert_eq!(window.pending(), 1);
        assert!(!window.ready());
    }
}
