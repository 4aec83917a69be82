//! Property tests for the frame codec

use espmon_hal::BufferTransport;
use espmon_protocol::{
    ChannelDescriptor, DataSample, Frame, FrameError, FrameReader, GradientFlags, GroupDescriptor,
    Rgba, ScreenDescriptor, LABEL_LEN, SCREEN_DESCRIPTOR_LEN, SUFFIX_LEN,
};
use heapless::String;
use proptest::prelude::*;

type Wire = BufferTransport<512, 16>;

fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        // Leave room for the terminator the encoder always writes
        if out.len() + c.len_utf8() > N - 1 {
            break;
        }
        let _ = out.push(c);
    }
    out
}

fn rgba() -> impl Strategy<Value = Rgba> {
    any::<[u8; 4]>().prop_map(Rgba::from_bytes)
}

fn channel() -> impl Strategy<Value = ChannelDescriptor> {
    (rgba(), "[a-z%°]{0,3}", 1u16..).prop_map(|(color, suffix, max)| ChannelDescriptor {
        color,
        suffix: bounded::<SUFFIX_LEN>(&suffix),
        max,
    })
}

fn group() -> impl Strategy<Value = GroupDescriptor> {
    ("[A-Za-z0-9 ]{0,11}", rgba(), channel(), channel()).prop_map(
        |(label, label_color, primary, secondary)| GroupDescriptor {
            label: bounded::<LABEL_LEN>(&label),
            label_color,
            primary,
            secondary,
        },
    )
}

fn screen() -> impl Strategy<Value = ScreenDescriptor> {
    (any::<i8>(), any::<u8>(), group(), group()).prop_map(|(index, flags, top, bottom)| {
        ScreenDescriptor {
            index,
            flags: GradientFlags(flags),
            top,
            bottom,
        }
    })
}

proptest! {
    #[test]
    fn prop_decoded_max_is_never_zero(payload in prop::collection::vec(any::<u8>(), SCREEN_DESCRIPTOR_LEN)) {
        let mut bytes = [0u8; SCREEN_DESCRIPTOR_LEN];
        bytes.copy_from_slice(&payload);
        let scr = ScreenDescriptor::decode(&bytes);
        for ch in scr.channels() {
            prop_assert!(ch.max >= 1);
        }
    }

    #[test]
    fn prop_frames_survive_the_wire(screens in prop::collection::vec(screen(), 1..4), samples in prop::collection::vec(any::<[u16; 4]>(), 0..8)) {
        let mut t = Wire::new();
        let mut expected = std::vec::Vec::new();
        let mut buf = [0u8; 1 + SCREEN_DESCRIPTOR_LEN];

        for scr in screens {
            let frame = Frame::Screen(scr);
            let len = frame.encode(&mut buf).unwrap();
            t.feed(&buf[..len]).unwrap();
            expected.push(frame);
        }
        for v in samples {
            let frame = Frame::Data(DataSample::new(v[0], v[1], v[2], v[3]));
            let len = frame.encode(&mut buf).unwrap();
            t.feed(&buf[..len]).unwrap();
            expected.push(frame);
        }

        let mut reader = FrameReader::new();
        for frame in expected {
            prop_assert_eq!(reader.read_frame(&mut t), Ok(Some(frame)));
        }
        prop_assert_eq!(reader.read_frame(&mut t), Ok(None));
    }

    #[test]
    fn prop_unknown_command_consumes_until_starvation(command in 2u8.., garbage in prop::collection::vec(any::<u8>(), 0..200)) {
        let mut t = Wire::new();
        t.feed(&[command]).unwrap();
        t.feed(&garbage).unwrap();

        let mut reader = FrameReader::new();
        prop_assert_eq!(reader.read_frame(&mut t), Err(FrameError::UnknownCommand(command)));
        prop_assert_eq!(t.pending(), 0);
        prop_assert_eq!(reader.stats().discarded_bytes as usize, garbage.len() + 1);
        prop_assert_eq!(reader.stats().frames, 0);
    }
}
