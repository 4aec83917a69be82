//! In-memory transport
//!
//! A loopback-style [`Transport`] backed by fixed-capacity buffers. Bytes
//! queued with [`BufferTransport::feed`] are what the reader sees; bytes the
//! session writes are captured for inspection.

use heapless::{Deque, Vec};

use crate::uart::{Transport, TransportError};

/// Fixed-capacity in-memory transport
///
/// `RX` bounds the receive queue, `TX` bounds the captured output.
#[derive(Debug, Default)]
pub struct BufferTransport<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Vec<u8, TX>,
    /// Remaining writes that will be rejected before writes succeed again
    failing_writes: u32,
    /// Total write attempts, successful or not
    write_attempts: u32,
}

impl<const RX: usize, const TX: usize> BufferTransport<RX, TX> {
    /// Create an empty transport
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            failing_writes: 0,
            write_attempts: 0,
        }
    }

    /// Queue bytes for the receive side
    ///
    /// Fails without queuing anything if the bytes do not fit.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.rx.capacity() - self.rx.len() < bytes.len() {
            return Err(TransportError::WriteFailed);
        }
        for &byte in bytes {
            // Capacity checked above
            let _ = self.rx.push_back(byte);
        }
        Ok(())
    }

    /// Number of bytes still waiting on the receive side
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Forget captured output
    pub fn clear_written(&mut self) {
        self.tx.clear();
    }

    /// Reject the next `count` writes
    pub fn fail_next_writes(&mut self, count: u32) {
        self.failing_writes = count;
    }

    /// Total write attempts seen
    pub fn write_attempts(&self) -> u32 {
        self.write_attempts
    }
}

impl<const RX: usize, const TX: usize> Transport for BufferTransport<RX, TX> {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        if self.rx.len() < buf.len() {
            // Short reads consume what was there, like a UART timeout would
            self.rx.clear();
            return Err(TransportError::ShortRead);
        }
        for slot in buf.iter_mut() {
            *slot = self.rx.pop_front().ok_or(TransportError::ShortRead)?;
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.write_attempts = self.write_attempts.saturating_add(1);
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(TransportError::WriteFailed);
        }
        self.tx
            .extend_from_slice(data)
            .map_err(|_| TransportError::WriteFailed)
    }
}
