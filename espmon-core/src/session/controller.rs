//! Telemetry session controller
//!
//! Runs once per scheduler tick. Each cycle:
//!
//! 1. Sends a poll request if the poll interval has elapsed
//! 2. Drains every frame the transport has buffered
//! 3. Applies screen frames to widget configuration and data frames to
//!    labels, bars and the averaging window
//! 4. Emits a history point when a full batch has been averaged
//! 5. Blanks the screen once when the link goes quiet

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use heapless::String;

use espmon_hal::Transport;
use espmon_protocol::{
    DataSample, Frame, GradientFlags, ReaderStats, Request, Rgba, ScreenDescriptor, SerialLink,
    SUFFIX_LEN,
};

use crate::aggregate::{ReadingWindow, AVERAGE_WINDOW};
use crate::channel::{self, Channel, Group, Reading};
use crate::config::SessionConfig;
use crate::link::{LinkMonitor, LinkState, LinkTransition};
use crate::traits::{DisplaySurface, InputSource, WidgetColors, WidgetId};

/// Alpha of a bar's background relative to its fill color (25%)
pub const BAR_BACK_ALPHA: u8 = 64;

/// Capacity of a formatted value label
pub const VALUE_TEXT_LEN: usize = 12;

/// What happened during one [`SessionController::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Frames decoded this cycle
    pub frames: u32,
    /// A poll request went out
    pub request_sent: bool,
    /// Link edge, if any
    pub transition: Option<LinkTransition>,
    /// A history point was appended
    pub history_point: bool,
}

impl CycleReport {
    /// Anything visible changed
    pub fn changed(&self) -> bool {
        self.frames > 0 || self.transition.is_some() || self.history_point
    }
}

/// Settings copied out of the active screen descriptor
#[derive(Debug, Clone)]
struct PageState {
    /// Selected page; `None` until a descriptor names one
    index: Option<u8>,
    maxima: [u16; 4],
    suffixes: [String<SUFFIX_LEN>; 4],
}

impl PageState {
    fn new() -> Self {
        Self {
            index: None,
            maxima: [1; 4],
            suffixes: [String::new(), String::new(), String::new(), String::new()],
        }
    }
}

/// Telemetry session: link, page state and aggregation
pub struct SessionController<T, D> {
    link: SerialLink<T, D>,
    monitor: LinkMonitor,
    window: ReadingWindow<AVERAGE_WINDOW>,
    page: PageState,
    config: SessionConfig,
    /// Time of the last poll request
    last_poll_ms: Option<u64>,
    /// Time of the last cycle
    last_cycle_ms: Option<u64>,
}

impl<T: Transport, D: DelayNs> SessionController<T, D> {
    /// Create a session over `transport`
    ///
    /// The link starts disconnected; call [`start`](Self::start) to put the
    /// screen in its boot state.
    pub fn new(transport: T, delay: D, config: SessionConfig) -> Self {
        let link = SerialLink::with_retry(transport, delay, config.retry_policy());
        Self {
            link,
            monitor: LinkMonitor::new(config.link_timeout_ms),
            window: ReadingWindow::new(),
            page: PageState::new(),
            config,
            last_poll_ms: None,
            last_cycle_ms: None,
        }
    }

    /// Show placeholders and the disconnected overlay
    pub fn start<S: DisplaySurface>(&mut self, surface: &mut S) {
        log_info!("session start, waiting for producer");
        for channel in Channel::ALL {
            surface.history_set_line(channel, Rgba::WHITE);
        }
        self.blank(surface);
        surface.request_redraw();
    }

    /// Run one cycle at time `now_ms`
    pub fn poll<S: DisplaySurface>(&mut self, now_ms: u64, surface: &mut S) -> CycleReport {
        let mut report = CycleReport::default();

        let elapsed = self
            .last_cycle_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_cycle_ms = Some(now_ms);

        let poll_due = self.last_poll_ms.map_or(true, |last| {
            now_ms.saturating_sub(last) >= u64::from(self.config.poll_interval_ms)
        });
        if poll_due {
            self.last_poll_ms = Some(now_ms);
            report.request_sent = self.send(Request::poll(self.page.index));
        }

        loop {
            match self.link.receive() {
                Ok(Some(frame)) => {
                    report.frames += 1;
                    if let Some(transition) = self.monitor.on_activity() {
                        report.transition = Some(transition);
                        self.on_reconnect(surface);
                    }
                    match frame {
                        Frame::Screen(screen) => self.apply_screen(&screen, surface),
                        Frame::Data(sample) => self.apply_sample(&sample, surface),
                    }
                }
                Ok(None) => break,
                Err(_e) => {
                    log_warn!("frame dropped: {}", _e);
                    break;
                }
            }
        }

        if let Some(average) = self.window.drain_average() {
            if self.monitor.is_connected() && self.config.history && surface.has_history() {
                for channel in Channel::ALL {
                    surface.history_push(channel, channel::level(average.get(channel)));
                }
                report.history_point = true;
            }
        }

        if report.frames == 0 {
            let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
            if let Some(transition) = self.monitor.tick(elapsed) {
                report.transition = Some(transition);
                log_info!("link lost after {} ms of silence", self.monitor.silence_ms());
                self.blank(surface);
            }
        }

        if report.changed() {
            surface.request_redraw();
        }
        report
    }

    /// Ask for the next page's descriptor
    ///
    /// Ignored while the link is down. Returns whether a request was sent.
    pub fn advance_page(&mut self) -> bool {
        if !self.monitor.is_connected() {
            return false;
        }
        let next = self.page.index.map_or(0, |index| index.wrapping_add(1));
        self.page.index = Some(next);
        log_debug!("advance to page {}", next);
        self.send(Request::ScreenInfo { page: next })
    }

    /// Check the input source and advance the page on a gesture
    pub fn poll_input<I: InputSource>(&mut self, input: &mut I) -> bool {
        input.poll_page_advance() && self.advance_page()
    }

    /// Selected page
    pub fn page(&self) -> Option<u8> {
        self.page.index
    }

    pub fn link_state(&self) -> LinkState {
        self.monitor.state()
    }

    pub fn monitor(&self) -> &LinkMonitor {
        &self.monitor
    }

    pub fn stats(&self) -> ReaderStats {
        self.link.stats()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn link(&self) -> &SerialLink<T, D> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut SerialLink<T, D> {
        &mut self.link
    }

    fn send(&mut self, request: Request) -> bool {
        match self.link.send(request) {
            Ok(()) => true,
            Err(_e) => {
                log_warn!("request {} dropped: {}", request, _e);
                false
            }
        }
    }

    fn on_reconnect<S: DisplaySurface>(&mut self, surface: &mut S) {
        log_info!("link up");
        surface.set_visible(WidgetId::Disconnected, false);
        self.page.index = None;
        self.window.reset();
    }

    fn apply_screen<S: DisplaySurface>(&mut self, screen: &ScreenDescriptor, surface: &mut S) {
        self.page.index = screen.page();
        log_debug!("screen for page {}", self.page.index);

        let flags = if self.config.monochrome {
            GradientFlags(screen.flags.0 & 0xF0)
        } else {
            screen.flags
        };

        for (group, descriptor) in Group::ALL.into_iter().zip([&screen.top, &screen.bottom]) {
            surface.apply_label(WidgetId::Title(group), &descriptor.label);
            let colors = WidgetColors::solid(descriptor.label_color);
            surface.apply_colors(WidgetId::Title(group), colors);
        }

        for (channel, descriptor) in Channel::ALL.into_iter().zip(screen.channels()) {
            let i = channel.index();
            self.page.maxima[i] = descriptor.max;
            self.page.suffixes[i] = descriptor.suffix.clone();

            surface.apply_colors(
                WidgetId::Bar(channel),
                WidgetColors::new(descriptor.color, descriptor.color.with_alpha(BAR_BACK_ALPHA)),
            );
            surface.apply_gradient(channel, flags.is_set(i));
            surface.history_set_line(channel, descriptor.color);
        }
        surface.history_clear();
    }

    fn apply_sample<S: DisplaySurface>(&mut self, sample: &DataSample, surface: &mut S) {
        let reading = Reading::normalize(sample, &self.page.maxima);
        let raw = sample.values();

        for channel in Channel::ALL {
            let i = channel.index();
            let mut text: String<VALUE_TEXT_LEN> = String::new();
            // u16 digits plus a 4-byte suffix always fit
            let _ = write!(text, "{}{}", raw[i], self.page.suffixes[i]);
            surface.apply_label(WidgetId::Value(channel), &text);
            surface.apply_bar(channel, reading.get(channel));
        }
        self.window.push(reading);
    }

    /// Placeholders, empty bars, empty graph, overlay on
    fn blank<S: DisplaySurface>(&mut self, surface: &mut S) {
        for channel in Channel::ALL {
            surface.apply_label(WidgetId::Value(channel), &self.config.placeholder);
            surface.apply_bar(channel, 0.0);
        }
        surface.history_clear();
        surface.set_visible(WidgetId::Disconnected, true);
        self.window.reset();
    }
}
