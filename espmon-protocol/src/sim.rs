//! Simulated telemetry producer
//!
//! [`SimulatedLink`] stands in for the PC companion on a bench with no host
//! attached. Every request written to it is answered immediately: screen
//! requests with a fixed CPU/GPU page, data requests with readings that
//! wander around fixed base values.

use heapless::{Deque, String};

use espmon_hal::{Transport, TransportError};

use crate::frame::{Frame, MAX_FRAME_LEN};
use crate::record::{
    ChannelDescriptor, DataSample, GradientFlags, GroupDescriptor, Rgba, ScreenDescriptor,
};
use crate::request::{Request, REQUEST_LEN};

/// Room for a screen frame plus a few data frames
const RX_CAPACITY: usize = 2 * MAX_FRAME_LEN;

/// Base readings before jitter: CPU load, CPU temp, GPU load, GPU temp
const BASE_SAMPLE: [u16; 4] = [50, 30, 15, 35];

/// Jitter span; each reading moves by -JITTER/2 ..< JITTER/2
const JITTER: u32 = 30;

/// Loopback producer answering requests with canned frames
pub struct SimulatedLink {
    rx: Deque<u8, RX_CAPACITY>,
    rng: u32,
    requests: u32,
}

impl SimulatedLink {
    /// Create a producer; the boot descriptor is already queued
    pub fn new(seed: u32) -> Self {
        let mut link = Self {
            rx: Deque::new(),
            // xorshift has a fixed point at zero
            rng: if seed == 0 { 0x2545_F491 } else { seed },
            requests: 0,
        };
        link.queue(&Frame::Screen(Self::screen()));
        link
    }

    /// The page this producer describes
    pub fn screen() -> ScreenDescriptor {
        ScreenDescriptor {
            index: 0,
            flags: GradientFlags((1 << 1) | (1 << 3)),
            top: GroupDescriptor {
                label: text("CPU"),
                label_color: Rgba::new(173, 216, 230, 255),
                primary: channel(Rgba::new(0x00, 0xFF, 0x00, 0xFF), "%", 100),
                secondary: channel(Rgba::new(0xFF, 0x7F, 0x00, 0xFF), "°", 90),
            },
            bottom: GroupDescriptor {
                label: text("GPU"),
                label_color: Rgba::new(255, 160, 122, 255),
                primary: channel(Rgba::WHITE, "%", 100),
                secondary: channel(Rgba::new(0xFF, 0x00, 0xFF, 0xFF), "°", 85),
            },
        }
    }

    /// Requests answered so far
    pub fn requests(&self) -> u32 {
        self.requests
    }

    fn sample(&mut self) -> DataSample {
        let mut values = BASE_SAMPLE;
        for value in values.iter_mut() {
            let jitter = (self.next_random() % JITTER) as i32 - (JITTER / 2) as i32;
            *value = (*value as i32 + jitter).clamp(0, u16::MAX as i32) as u16;
        }
        DataSample::new(values[0], values[1], values[2], values[3])
    }

    fn next_random(&mut self) -> u32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        x
    }

    fn queue(&mut self, frame: &Frame) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let Ok(len) = frame.encode(&mut buf) else {
            return;
        };
        // A host that never reads just loses the newest answer
        if self.rx.capacity() - self.rx.len() < len {
            return;
        }
        for &byte in &buf[..len] {
            let _ = self.rx.push_back(byte);
        }
    }
}

impl Transport for SimulatedLink {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        if self.rx.len() < buf.len() {
            self.rx.clear();
            return Err(TransportError::ShortRead);
        }
        for slot in buf.iter_mut() {
            *slot = self.rx.pop_front().ok_or(TransportError::ShortRead)?;
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let Ok(bytes) = <[u8; REQUEST_LEN]>::try_from(data) else {
            return Err(TransportError::WriteFailed);
        };
        match Request::from_bytes(bytes) {
            Some(Request::ScreenInfo { .. }) => self.queue(&Frame::Screen(Self::screen())),
            Some(Request::Data { .. }) => {
                let sample = self.sample();
                self.queue(&Frame::Data(sample));
            }
            None => return Ok(()),
        }
        self.requests = self.requests.saturating_add(1);
        Ok(())
    }
}

fn text<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

fn channel(color: Rgba, suffix: &str, max: u16) -> ChannelDescriptor {
    ChannelDescriptor {
        color,
        suffix: text(suffix),
        max,
    }
}
