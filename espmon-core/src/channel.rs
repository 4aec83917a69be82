//! Channel identity and normalized readings

use espmon_protocol::DataSample;

/// One of the two label groups on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Group {
    Top,
    Bottom,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Top, Group::Bottom];
}

/// One of the four value channels
///
/// The discriminant is the wire order and the history line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Top1 = 0,
    Top2 = 1,
    Bottom1 = 2,
    Bottom2 = 3,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Top1,
        Channel::Top2,
        Channel::Bottom1,
        Channel::Bottom2,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn group(self) -> Group {
        match self {
            Channel::Top1 | Channel::Top2 => Group::Top,
            Channel::Bottom1 | Channel::Bottom2 => Group::Bottom,
        }
    }
}

/// Four channel values, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    values: [f32; 4],
}

impl Reading {
    /// Build a reading, clamping every value into [0, 1]
    ///
    /// NaN becomes 0.
    pub fn new(values: [f32; 4]) -> Self {
        Self {
            values: values.map(clamp_unit),
        }
    }

    /// Same value on every channel
    pub fn splat(value: f32) -> Self {
        Self::new([value; 4])
    }

    /// Normalize raw readings against per-channel maxima
    ///
    /// A zero maximum is treated as 1.
    pub fn normalize(sample: &DataSample, maxima: &[u16; 4]) -> Self {
        let raw = sample.values();
        let mut values = [0.0f32; 4];
        for (i, value) in values.iter_mut().enumerate() {
            *value = raw[i] as f32 / maxima[i].max(1) as f32;
        }
        Self::new(values)
    }

    pub fn get(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    pub fn values(&self) -> [f32; 4] {
        self.values
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Quantize a normalized value to a history level (0-255)
pub fn level(value: f32) -> u8 {
    (clamp_unit(value) * 255.0 + 0.5) as u8
}
