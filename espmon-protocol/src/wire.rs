//! Cursor helpers for the packed little-endian record layout

use heapless::String;

/// Sequential reader over a fixed record
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    pub(crate) fn u8(&mut self) -> u8 {
        let [b] = self.bytes::<1>();
        b
    }

    pub(crate) fn i8(&mut self) -> i8 {
        self.u8() as i8
    }

    pub(crate) fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.bytes::<2>())
    }

    /// Read a `char[N]` field into a bounded string
    pub(crate) fn text<const N: usize>(&mut self) -> String<N> {
        let field = self.bytes::<N>();
        decode_text(&field)
    }
}

/// Sequential writer over a fixed record
pub(crate) struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    pub(crate) fn u8(&mut self, value: u8) {
        self.bytes(&[value]);
    }

    pub(crate) fn i8(&mut self, value: i8) {
        self.u8(value as u8);
    }

    pub(crate) fn u16(&mut self, value: u16) {
        self.bytes(&value.to_le_bytes());
    }

    /// Write `text` into a NUL-padded `char[width]` field
    ///
    /// At most `width - 1` bytes are written so a terminator always fits.
    /// Truncation never splits a UTF-8 sequence.
    pub(crate) fn text(&mut self, text: &str, width: usize) {
        let field = &mut self.buf[self.pos..self.pos + width];
        field.fill(0);
        let mut len = text.len().min(width.saturating_sub(1));
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        field[..len].copy_from_slice(&text.as_bytes()[..len]);
        self.pos += width;
    }
}

/// Bounded copy of a NUL-terminated wire field
///
/// Stops at the first NUL or at the field width, whichever comes first. A
/// trailing partial UTF-8 sequence is dropped; earlier invalid bytes end the
/// string at the last valid character.
pub(crate) fn decode_text<const N: usize>(field: &[u8]) -> String<N> {
    let end = field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(field.len())
        .min(N);
    let bytes = &field[..end];
    let text = match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    };

    let mut out = String::new();
    // Cannot overflow: text is at most N bytes
    let _ = out.push_str(text);
    out
}
