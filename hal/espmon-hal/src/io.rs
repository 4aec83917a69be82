//! `embedded-io` adapter
//!
//! Board UART drivers (embassy buffered UARTs and friends) expose blocking
//! `embedded-io` traits. [`IoTransport`] lifts any such driver into a
//! [`Transport`].

use embedded_io::{Read, ReadExactError, ReadReady, Write};

use crate::uart::{Transport, TransportError};

/// [`Transport`] over a blocking `embedded-io` device
pub struct IoTransport<T> {
    inner: T,
}

impl<T> IoTransport<T> {
    /// Wrap a device
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped device
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the wrapped device
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the device
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Transport for IoTransport<T>
where
    T: Read + ReadReady + Write,
{
    fn try_read_byte(&mut self) -> Option<u8> {
        match self.inner.read_ready() {
            Ok(true) => {}
            _ => return None,
        }
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.inner.read_exact(buf).map_err(|e| match e {
            ReadExactError::UnexpectedEof => TransportError::ShortRead,
            ReadExactError::Other(_) => TransportError::Bus,
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.inner
            .write_all(data)
            .map_err(|_| TransportError::WriteFailed)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.inner.flush().map_err(|_| TransportError::Bus)
    }
}
