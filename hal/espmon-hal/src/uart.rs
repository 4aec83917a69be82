//! Serial transport abstraction
//!
//! The telemetry link is a plain byte stream. The core needs three
//! operations from it: a non-blocking single-byte probe, an exact-length
//! read for frame payloads, and a write for poll requests.

/// Errors reported by a [`Transport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Fewer bytes than requested were available
    ShortRead,
    /// The write could not be queued (buffer full or bus busy)
    WriteFailed,
    /// Underlying bus error (framing, overrun, noise)
    Bus,
}

/// Byte-oriented serial link
pub trait Transport {
    /// Read one byte if one is immediately available
    ///
    /// Never blocks. `None` means the receive side is currently empty.
    fn try_read_byte(&mut self) -> Option<u8>;

    /// Fill `buf` completely
    ///
    /// Implementations may block until the bytes arrive. A short read is
    /// reported as [`TransportError::ShortRead`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError>;

    /// Queue `data` for transmission
    fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Wait until queued data has left the transmitter
    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn try_read_byte(&mut self) -> Option<u8> {
        (**self).try_read_byte()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        (**self).read_exact(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush()
    }
}
