//! Session controller driving a real display session

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use espmon_core::config::SessionConfig;
use espmon_core::link::{LinkState, LinkTransition};
use espmon_core::session::SessionController;
use espmon_core::traits::{DisplaySurface, InputSource};
use espmon_core::Channel;
use espmon_display::{present, DisplayBackend, DisplayError, DisplaySession};
use espmon_hal::{BufferTransport, NoopDelay};
use espmon_protocol::{
    DataSample, Frame, GradientFlags, Rgba, ScreenDescriptor, SimulatedLink, MAX_FRAME_LEN,
};

type Wire = BufferTransport<2048, 512>;

/// 128x64 monochrome panel that counts flushes
struct TestPanel {
    pixels: Vec<BinaryColor>,
    flushes: u32,
}

impl TestPanel {
    fn new() -> Self {
        Self {
            pixels: vec![BinaryColor::Off; 128 * 64],
            flushes: 0,
        }
    }
}

impl OriginDimensions for TestPanel {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for TestPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        for Pixel(p, c) in pixels {
            if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                self.pixels[p.y as usize * 128 + p.x as usize] = c;
            }
        }
        Ok(())
    }
}

impl DisplayBackend for TestPanel {
    fn flush(&mut self) -> Result<(), DisplayError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Input that fires once on request
#[derive(Default)]
struct Tap {
    pending: bool,
}

impl InputSource for Tap {
    fn poll_page_advance(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }
}

fn descriptor() -> ScreenDescriptor {
    let mut screen = SimulatedLink::screen();
    screen.index = 0;
    screen.flags = GradientFlags(0);
    screen.top.primary.max = 100;
    screen.top.primary.suffix.clear();
    screen.top.primary.suffix.push_str("%").unwrap();
    screen
}

fn feed(session: &mut SessionController<Wire, NoopDelay>, frame: Frame) {
    let mut buf = [0u8; MAX_FRAME_LEN];
    let len = frame.encode(&mut buf).unwrap();
    session.link_mut().transport_mut().feed(&buf[..len]).unwrap();
}

fn new_session(history: bool) -> (SessionController<Wire, NoopDelay>, DisplaySession) {
    let mut controller = SessionController::new(Wire::new(), NoopDelay, SessionConfig::default());
    let mut display = DisplaySession::new(history);
    controller.start(&mut display);
    (controller, display)
}

#[test]
fn descriptor_then_sample_updates_label_and_bar() {
    let (mut controller, mut display) = new_session(false);

    feed(&mut controller, Frame::Screen(descriptor()));
    feed(&mut controller, Frame::Data(DataSample::new(55, 0, 0, 0)));
    controller.poll(0, &mut display);

    assert_eq!(display.value(Channel::Top1).text.as_str(), "55%");
    assert!((display.bar(Channel::Top1).value - 0.55).abs() < 1e-6);
    assert!(!display.overlay_visible());
    assert_eq!(display.title(espmon_core::Group::Top).text.as_str(), "CPU");
}

#[test]
fn bar_background_is_quarter_opacity() {
    let (mut controller, mut display) = new_session(false);
    feed(&mut controller, Frame::Screen(descriptor()));
    controller.poll(0, &mut display);

    let colors = display.bar(Channel::Top2).colors;
    assert_eq!(colors.foreground, Rgba::new(0xFF, 0x7F, 0x00, 0xFF));
    assert_eq!(colors.background, Rgba::new(0xFF, 0x7F, 0x00, 64));
}

#[test]
fn silence_blanks_display_exactly_once() {
    let (mut controller, mut display) = new_session(true);
    feed(&mut controller, Frame::Screen(descriptor()));
    for _ in 0..5 {
        feed(&mut controller, Frame::Data(DataSample::new(80, 40, 20, 10)));
    }
    controller.poll(0, &mut display);
    assert!(!display.history().is_empty());
    assert_eq!(controller.link_state(), LinkState::Connected);

    let mut disconnects = 0;
    for step in 1..=40u64 {
        let report = controller.poll(step * 100, &mut display);
        if report.transition == Some(LinkTransition::Disconnected) {
            disconnects += 1;
        }
    }

    assert_eq!(disconnects, 1);
    assert!(display.overlay_visible());
    assert!(display.history().is_empty());
    for channel in Channel::ALL {
        assert_eq!(display.bar(channel).value, 0.0);
        assert_eq!(display.value(channel).text.as_str(), "---");
    }
}

#[test]
fn present_flushes_only_when_dirty() {
    let (mut controller, mut display) = new_session(false);
    let mut panel = TestPanel::new();

    assert_eq!(present(&mut display, &mut panel), Ok(true));
    assert_eq!(present(&mut display, &mut panel), Ok(false));
    assert_eq!(panel.flushes, 1);

    // A cycle with no traffic changes nothing visible
    controller.poll(0, &mut display);
    assert_eq!(present(&mut display, &mut panel), Ok(false));

    feed(&mut controller, Frame::Data(DataSample::new(1, 2, 3, 4)));
    controller.poll(100, &mut display);
    assert_eq!(present(&mut display, &mut panel), Ok(true));
    assert_eq!(panel.flushes, 2);
    assert!(panel.pixels.iter().any(|&c| c == BinaryColor::On));
}

#[test]
fn simulated_producer_drives_a_full_session() {
    let mut controller =
        SessionController::new(SimulatedLink::new(7), NoopDelay, SessionConfig::default());
    let mut display = DisplaySession::new(true);
    controller.start(&mut display);

    // The boot descriptor is already waiting; each later poll gets an answer
    for step in 0..50u64 {
        controller.poll(step * 100, &mut display);
    }

    assert_eq!(controller.link_state(), LinkState::Connected);
    assert_eq!(controller.page(), Some(0));
    assert!(!display.overlay_visible());
    let text = display.value(Channel::Top1).text.as_str();
    assert!(text.ends_with('%'));
    assert!(display.history().series(Channel::Top1).len() >= 8);
    assert_eq!(
        display.history().color(Channel::Bottom2),
        Rgba::new(0xFF, 0x00, 0xFF, 0xFF)
    );
}

#[test]
fn page_advance_ignored_while_disconnected() {
    let (mut controller, mut display) = new_session(false);
    let mut tap = Tap { pending: true };
    assert!(!controller.poll_input(&mut tap));

    feed(&mut controller, Frame::Screen(descriptor()));
    controller.poll(0, &mut display);
    controller.link_mut().transport_mut().clear_written();

    tap.pending = true;
    assert!(controller.poll_input(&mut tap));
    assert_eq!(controller.page(), Some(1));
    assert_eq!(controller.link().transport().written(), &[0, 1]);

    // Next poll asks for data on the new page
    controller.poll(100, &mut display);
    assert_eq!(controller.link().transport().written(), &[0, 1, 1, 1]);
    assert!(!display.has_history());
}
