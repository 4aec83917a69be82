//! Fixed-layout records carried by response frames
//!
//! Screen descriptor layout (74 bytes, packed, little-endian):
//! ```text
//! index:i8  flags:u8
//! top group    (36 bytes)
//! bottom group (36 bytes)
//! ```
//! Each group:
//! ```text
//! label:char[12]  label_color:u8[4]
//! color1:u8[4]  suffix1:char[4]  max1:u16
//! color2:u8[4]  suffix2:char[4]  max2:u16
//! ```

use heapless::String;

use crate::wire::{WireReader, WireWriter};

/// Wire size of a screen descriptor payload
pub const SCREEN_DESCRIPTOR_LEN: usize = 74;

/// Wire size of a data sample payload
pub const DATA_SAMPLE_LEN: usize = 8;

/// Width of a group label field, terminator included
pub const LABEL_LEN: usize = 12;

/// Width of a unit suffix field, terminator included
pub const SUFFIX_LEN: usize = 4;

/// RGBA color as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgba = Rgba::new(0x00, 0x00, 0x00, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Perceived brightness, 0-255
    pub fn luma(self) -> u8 {
        ((self.r as u16 * 77 + self.g as u16 * 150 + self.b as u16 * 29) >> 8) as u8
    }
}

/// Per-channel gradient enable bits
///
/// Bit 0 top value 1, bit 1 top value 2, bit 2 bottom value 1, bit 3 bottom
/// value 2. The upper nibble is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GradientFlags(pub u8);

impl GradientFlags {
    pub const NONE: GradientFlags = GradientFlags(0);

    /// Whether channel `index` (0-3) draws a gradient
    pub fn is_set(self, index: usize) -> bool {
        index < 4 && self.0 & (1 << index) != 0
    }

    /// Set or clear channel `index`
    pub fn set(&mut self, index: usize, enabled: bool) {
        if index >= 4 {
            return;
        }
        if enabled {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }
}

/// One value channel of a page
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDescriptor {
    /// Bar and history line color
    pub color: Rgba,
    /// Unit suffix appended to the raw value
    pub suffix: String<SUFFIX_LEN>,
    /// Normalization denominator, never zero after decoding
    pub max: u16,
}

impl Default for ChannelDescriptor {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            suffix: String::new(),
            max: 1,
        }
    }
}

impl ChannelDescriptor {
    fn decode(r: &mut WireReader<'_>) -> Self {
        let color = Rgba::from_bytes(r.bytes::<4>());
        let suffix = r.text::<SUFFIX_LEN>();
        // A zero maximum would divide by zero during normalization
        let max = r.u16().max(1);
        Self { color, suffix, max }
    }

    fn encode(&self, w: &mut WireWriter<'_>) {
        w.bytes(&self.color.to_bytes());
        w.text(&self.suffix, SUFFIX_LEN);
        w.u16(self.max);
    }
}

/// Label plus two value channels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GroupDescriptor {
    pub label: String<LABEL_LEN>,
    pub label_color: Rgba,
    pub primary: ChannelDescriptor,
    pub secondary: ChannelDescriptor,
}

impl GroupDescriptor {
    fn decode(r: &mut WireReader<'_>) -> Self {
        let label = r.text::<LABEL_LEN>();
        let label_color = Rgba::from_bytes(r.bytes::<4>());
        let primary = ChannelDescriptor::decode(r);
        let secondary = ChannelDescriptor::decode(r);
        Self {
            label,
            label_color,
            primary,
            secondary,
        }
    }

    fn encode(&self, w: &mut WireWriter<'_>) {
        w.text(&self.label, LABEL_LEN);
        w.bytes(&self.label_color.to_bytes());
        self.primary.encode(w);
        self.secondary.encode(w);
    }
}

/// Configuration for one page of telemetry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenDescriptor {
    /// Page index; negative means "no page"
    pub index: i8,
    pub flags: GradientFlags,
    pub top: GroupDescriptor,
    pub bottom: GroupDescriptor,
}

impl ScreenDescriptor {
    /// Decode a screen descriptor payload
    pub fn decode(payload: &[u8; SCREEN_DESCRIPTOR_LEN]) -> Self {
        let mut r = WireReader::new(payload);
        let index = r.i8();
        let flags = GradientFlags(r.u8());
        let top = GroupDescriptor::decode(&mut r);
        let bottom = GroupDescriptor::decode(&mut r);
        Self {
            index,
            flags,
            top,
            bottom,
        }
    }

    /// Encode into the wire layout
    pub fn encode(&self, out: &mut [u8; SCREEN_DESCRIPTOR_LEN]) {
        let mut w = WireWriter::new(out);
        w.i8(self.index);
        w.u8(self.flags.0);
        self.top.encode(&mut w);
        self.bottom.encode(&mut w);
    }

    /// Page index, if this descriptor names one
    pub fn page(&self) -> Option<u8> {
        u8::try_from(self.index).ok()
    }

    /// Channels in wire order: top 1, top 2, bottom 1, bottom 2
    pub fn channels(&self) -> [&ChannelDescriptor; 4] {
        [
            &self.top.primary,
            &self.top.secondary,
            &self.bottom.primary,
            &self.bottom.secondary,
        ]
    }
}

/// Raw readings for the four channels of the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataSample {
    pub top_value1: u16,
    pub top_value2: u16,
    pub bottom_value1: u16,
    pub bottom_value2: u16,
}

impl DataSample {
    pub const fn new(
        top_value1: u16,
        top_value2: u16,
        bottom_value1: u16,
        bottom_value2: u16,
    ) -> Self {
        Self {
            top_value1,
            top_value2,
            bottom_value1,
            bottom_value2,
        }
    }

    /// Decode a data sample payload
    pub fn decode(payload: &[u8; DATA_SAMPLE_LEN]) -> Self {
        let mut r = WireReader::new(payload);
        Self {
            top_value1: r.u16(),
            top_value2: r.u16(),
            bottom_value1: r.u16(),
            bottom_value2: r.u16(),
        }
    }

    /// Encode into the wire layout
    pub fn encode(&self, out: &mut [u8; DATA_SAMPLE_LEN]) {
        let mut w = WireWriter::new(out);
        for value in self.values() {
            w.u16(value);
        }
    }

    /// Values in wire order: top 1, top 2, bottom 1, bottom 2
    pub fn values(&self) -> [u16; 4] {
        [
            self.top_value1,
            self.top_value2,
            self.bottom_value1,
            self.bottom_value2,
        ]
    }
}
