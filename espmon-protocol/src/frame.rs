//! Response frame decoding
//!
//! Frame format:
//! - COMMAND (1 byte): 0 = screen descriptor, 1 = data sample
//! - PAYLOAD (fixed size per command): packed little-endian record
//!
//! There is no length field and no checksum; the command byte alone decides
//! how many payload bytes follow.

use espmon_hal::Transport;

use crate::record::{DataSample, ScreenDescriptor, DATA_SAMPLE_LEN, SCREEN_DESCRIPTOR_LEN};

/// Largest encoded frame (command byte plus screen descriptor)
pub const MAX_FRAME_LEN: usize = 1 + SCREEN_DESCRIPTOR_LEN;

/// Errors that can occur while reading or encoding frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Command byte is neither screen nor data; input was drained
    UnknownCommand(u8),
    /// Payload ended early
    Truncated(FrameKind),
    /// Request could not be written after all retries
    WriteFailed,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Frame discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    Screen,
    Data,
}

impl FrameKind {
    pub const CMD_SCREEN: u8 = 0;
    pub const CMD_DATA: u8 = 1;

    /// Map a command byte to a frame kind
    pub fn from_command(byte: u8) -> Option<Self> {
        match byte {
            Self::CMD_SCREEN => Some(Self::Screen),
            Self::CMD_DATA => Some(Self::Data),
            _ => None,
        }
    }

    pub fn command(self) -> u8 {
        match self {
            Self::Screen => Self::CMD_SCREEN,
            Self::Data => Self::CMD_DATA,
        }
    }

    /// Payload size following the command byte
    pub fn payload_len(self) -> usize {
        match self {
            Self::Screen => SCREEN_DESCRIPTOR_LEN,
            Self::Data => DATA_SAMPLE_LEN,
        }
    }
}

/// A decoded response frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    Screen(ScreenDescriptor),
    Data(DataSample),
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Screen(_) => FrameKind::Screen,
            Frame::Data(_) => FrameKind::Data,
        }
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let kind = self.kind();
        let len = 1 + kind.payload_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = kind.command();
        match self {
            Frame::Screen(screen) => {
                let mut payload = [0u8; SCREEN_DESCRIPTOR_LEN];
                screen.encode(&mut payload);
                buffer[1..len].copy_from_slice(&payload);
            }
            Frame::Data(sample) => {
                let mut payload = [0u8; DATA_SAMPLE_LEN];
                sample.encode(&mut payload);
                buffer[1..len].copy_from_slice(&payload);
            }
        }
        Ok(len)
    }
}

/// Counters kept by a [`FrameReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReaderStats {
    /// Frames decoded successfully
    pub frames: u32,
    /// Unknown command bytes seen
    pub malformed: u32,
    /// Payload reads that came up short
    pub truncated: u32,
    /// Bytes thrown away while resynchronizing
    pub discarded_bytes: u32,
}

/// Pulls frames out of a [`Transport`]
#[derive(Debug, Clone, Default)]
pub struct FrameReader {
    stats: ReaderStats,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read at most one frame
    ///
    /// Returns `Ok(None)` when no command byte is waiting. An unknown
    /// command drains the transport until nothing is immediately available
    /// and reports [`FrameError::UnknownCommand`]; a short payload reports
    /// [`FrameError::Truncated`]. Neither leaves the reader in a bad state:
    /// the next call starts fresh on the next command byte.
    pub fn read_frame<T: Transport>(
        &mut self,
        transport: &mut T,
    ) -> Result<Option<Frame>, FrameError> {
        let Some(command) = transport.try_read_byte() else {
            return Ok(None);
        };

        let frame = match FrameKind::from_command(command) {
            Some(FrameKind::Screen) => {
                let mut payload = [0u8; SCREEN_DESCRIPTOR_LEN];
                self.fill(transport, &mut payload, FrameKind::Screen)?;
                Frame::Screen(ScreenDescriptor::decode(&payload))
            }
            Some(FrameKind::Data) => {
                let mut payload = [0u8; DATA_SAMPLE_LEN];
                self.fill(transport, &mut payload, FrameKind::Data)?;
                Frame::Data(DataSample::decode(&payload))
            }
            None => {
                self.stats.malformed = self.stats.malformed.saturating_add(1);
                // Count the command byte itself
                let mut discarded: u32 = 1;
                while transport.try_read_byte().is_some() {
                    discarded = discarded.saturating_add(1);
                }
                self.stats.discarded_bytes = self.stats.discarded_bytes.saturating_add(discarded);
                return Err(FrameError::UnknownCommand(command));
            }
        };

        self.stats.frames = self.stats.frames.saturating_add(1);
        Ok(Some(frame))
    }

    fn fill<T: Transport>(
        &mut self,
        transport: &mut T,
        payload: &mut [u8],
        kind: FrameKind,
    ) -> Result<(), FrameError> {
        transport.read_exact(payload).map_err(|_| {
            self.stats.truncated = self.stats.truncated.saturating_add(1);
            FrameError::Truncated(kind)
        })
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espmon_hal::BufferTransport;

    use crate::record::Rgba;

    type Wire = BufferTransport<256, 16>;

    #[test]
    fn test_empty_transport_yields_nothing() {
        let mut t = Wire::new();
        let mut reader = FrameReader::new();
        assert_eq!(reader.read_frame(&mut t), Ok(None));
        assert_eq!(reader.stats(), ReaderStats::default());
    }

    #[test]
    fn test_screen_frame_decodes_field_exact() {
        let mut payload = [0u8; SCREEN_DESCRIPTOR_LEN];
        payload[0] = 0; // index
        payload[1] = 0b0001;
        payload[2..5].copy_from_slice(b"CPU");
        payload[18..22].copy_from_slice(&[0, 255, 0, 255]);
        payload[22] = b'%';
        payload[26..28].copy_from_slice(&100u16.to_le_bytes());
        payload[38..41].copy_from_slice(b"GPU");
        payload[72..74].copy_from_slice(&85u16.to_le_bytes());

        let mut t = Wire::new();
        t.feed(&[FrameKind::CMD_SCREEN]).unwrap();
        t.feed(&payload).unwrap();

        let mut reader = FrameReader::new();
        let Some(Frame::Screen(scr)) = reader.read_frame(&mut t).unwrap() else {
            panic!("expected screen frame");
        };
        assert_eq!(scr.index, 0);
        assert!(scr.flags.is_set(0));
        assert_eq!(scr.top.label.as_str(), "CPU");
        assert_eq!(scr.top.primary.color, Rgba::new(0, 255, 0, 255));
        assert_eq!(scr.top.primary.suffix.as_str(), "%");
        assert_eq!(scr.top.primary.max, 100);
        assert_eq!(scr.top.secondary.max, 1); // zero on the wire
        assert_eq!(scr.bottom.label.as_str(), "GPU");
        assert_eq!(scr.bottom.secondary.max, 85);
        assert_eq!(t.pending(), 0);
        assert_eq!(reader.stats().frames, 1);
    }

    #[test]
    fn test_data_frame_decodes() {
        let mut t = Wire::new();
        t.feed(&[FrameKind::CMD_DATA, 55, 0, 30, 0, 15, 0, 35, 0]).unwrap();

        let mut reader = FrameReader::new();
        assert_eq!(
            reader.read_frame(&mut t),
            Ok(Some(Frame::Data(DataSample::new(55, 30, 15, 35))))
        );
    }

    #[test]
    fn test_unknown_command_drains_everything() {
        let mut t = Wire::new();
        t.feed(&[0x02, 0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]).unwrap();

        let mut reader = FrameReader::new();
        assert_eq!(reader.read_frame(&mut t), Err(FrameError::UnknownCommand(0x02)));
        assert_eq!(t.pending(), 0);
        assert_eq!(reader.stats().malformed, 1);
        assert_eq!(reader.stats().discarded_bytes, 7);
        assert_eq!(reader.read_frame(&mut t), Ok(None));
    }

    #[test]
    fn test_short_payload_is_not_fatal() {
        let mut t = Wire::new();
        t.feed(&[FrameKind::CMD_DATA, 1, 2, 3]).unwrap();

        let mut reader = FrameReader::new();
        assert_eq!(
            reader.read_frame(&mut t),
            Err(FrameError::Truncated(FrameKind::Data))
        );
        assert_eq!(reader.stats().truncated, 1);

        // The next complete frame still decodes
        t.feed(&[FrameKind::CMD_DATA, 1, 0, 2, 0, 3, 0, 4, 0]).unwrap();
        assert_eq!(
            reader.read_frame(&mut t),
            Ok(Some(Frame::Data(DataSample::new(1, 2, 3, 4))))
        );
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let mut t = Wire::new();

        let screen = Frame::Screen(ScreenDescriptor::default());
        let len = screen.encode(&mut buf).unwrap();
        assert_eq!(len, MAX_FRAME_LEN);
        t.feed(&buf[..len]).unwrap();

        let data = Frame::Data(DataSample::new(9, 8, 7, 6));
        let len = data.encode(&mut buf).unwrap();
        t.feed(&buf[..len]).unwrap();

        let mut reader = FrameReader::new();
        assert_eq!(
            reader.read_frame(&mut t).unwrap().map(|f| f.kind()),
            Some(FrameKind::Screen)
        );
        assert_eq!(reader.read_frame(&mut t), Ok(Some(data)));
        assert_eq!(reader.read_frame(&mut t), Ok(None));
    }

    #[test]
    fn test_encode_rejects_small_buffer() {
        let mut buf = [0u8; 4];
        let frame = Frame::Data(DataSample::default());
        assert_eq!(frame.encode(&mut buf), Err(FrameError::BufferTooSmall));
    }
}
