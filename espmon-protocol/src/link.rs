//! Request/response link over a [`Transport`]
//!
//! Writes are retried: a UART transmit queue can be momentarily full while
//! the producer is slow to drain it. After the retry budget is spent the
//! request is dropped; the next poll tick sends a fresh one.

use embedded_hal::delay::DelayNs;
use espmon_hal::Transport;

use crate::frame::{Frame, FrameError, FrameReader, ReaderStats};
use crate::request::Request;

/// Write retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total write attempts before giving up (at least one is always made)
    pub attempts: u32,
    /// Pause between attempts
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1000,
            delay_ms: 5,
        }
    }
}

/// Frame reader and request writer sharing one transport
pub struct SerialLink<T, D> {
    transport: T,
    delay: D,
    reader: FrameReader,
    retry: RetryPolicy,
    dropped_requests: u32,
}

impl<T: Transport, D: DelayNs> SerialLink<T, D> {
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_retry(transport, delay, RetryPolicy::default())
    }

    pub fn with_retry(transport: T, delay: D, retry: RetryPolicy) -> Self {
        Self {
            transport,
            delay,
            reader: FrameReader::new(),
            retry,
            dropped_requests: 0,
        }
    }

    /// Write one request, retrying per the policy, then wait for it to
    /// leave the transmitter
    pub fn send(&mut self, request: Request) -> Result<(), FrameError> {
        let bytes = request.to_bytes();
        let attempts = self.retry.attempts.max(1);

        for attempt in 0..attempts {
            if self.transport.write(&bytes).is_ok() {
                return self.transport.flush().map_err(|_| FrameError::WriteFailed);
            }
            if attempt + 1 < attempts {
                self.delay.delay_ms(self.retry.delay_ms);
            }
        }

        self.dropped_requests = self.dropped_requests.saturating_add(1);
        Err(FrameError::WriteFailed)
    }

    /// Read at most one frame; see [`FrameReader::read_frame`]
    pub fn receive(&mut self) -> Result<Option<Frame>, FrameError> {
        self.reader.read_frame(&mut self.transport)
    }

    pub fn stats(&self) -> ReaderStats {
        self.reader.stats()
    }

    /// Requests given up on after exhausting the retry budget
    pub fn dropped_requests(&self) -> u32 {
        self.dropped_requests
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espmon_hal::{BufferTransport, NoopDelay};

    /// Counts requested delay time
    #[derive(Default)]
    struct CountingDelay {
        total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    #[test]
    fn test_send_writes_two_bytes() {
        let mut link = SerialLink::new(BufferTransport::<8, 8>::new(), NoopDelay);
        link.send(Request::Data { page: 2 }).unwrap();
        assert_eq!(link.transport().written(), &[1, 2]);
    }

    #[test]
    fn test_send_retries_until_accepted() {
        let mut transport = BufferTransport::<8, 8>::new();
        transport.fail_next_writes(3);
        let mut link = SerialLink::new(transport, CountingDelay::default());

        link.send(Request::ScreenInfo { page: 0 }).unwrap();
        assert_eq!(link.transport().write_attempts(), 4);
        assert_eq!(link.transport().written(), &[0, 0]);

        let (_, delay) = link.into_parts();
        assert_eq!(delay.total_ms, 15);
    }

    #[test]
    fn test_send_gives_up_after_budget() {
        let mut transport = BufferTransport::<8, 8>::new();
        transport.fail_next_writes(2000);
        let mut link = SerialLink::new(transport, NoopDelay);

        assert_eq!(link.send(Request::Data { page: 0 }), Err(FrameError::WriteFailed));
        assert_eq!(link.transport().write_attempts(), 1000);
        assert_eq!(link.dropped_requests(), 1);
        assert!(link.transport().written().is_empty());
    }

    #[test]
    fn test_receive_goes_through_reader() {
        let mut link = SerialLink::new(BufferTransport::<16, 8>::new(), NoopDelay);
        link.transport_mut().feed(&[1, 4, 0, 3, 0, 2, 0, 1, 0]).unwrap();
        assert!(matches!(link.receive(), Ok(Some(Frame::Data(_)))));
        assert_eq!(link.stats().frames, 1);
    }
}
