//! EspMon Display Firmware
//!
//! Telemetry display for an STM32F072 board with a 128x64 SH1106 OLED.
//! Polls the PC companion over UART and shows two groups of two gauges.
//!
//! With the `simulated-link` feature the UART is replaced by a built-in
//! producer so the screen can be checked on a bench with no host attached.

#![no_std]
#![no_main]

mod sh1106;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::i2c::{self, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_time::{Delay, Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use espmon_core::config::{parse_session_config, SessionConfig};
use espmon_core::session::SessionController;
use espmon_core::traits::ButtonInput;
use espmon_display::{present, DisplaySession};
use espmon_hal::InputPin;

use crate::sh1106::Sh1106;

#[cfg(not(feature = "simulated-link"))]
use {
    embassy_stm32::bind_interrupts,
    embassy_stm32::peripherals::USART2,
    embassy_stm32::usart::{self, BufferedUart},
    espmon_hal::IoTransport,
    static_cell::StaticCell,
};

#[cfg(not(feature = "simulated-link"))]
bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
});

#[cfg(not(feature = "simulated-link"))]
type Link = IoTransport<BufferedUart<'static>>;

#[cfg(feature = "simulated-link")]
type Link = espmon_protocol::SimulatedLink;

type Panel = Sh1106<I2c<'static, Blocking, Master>>;

/// Board configuration, checked by the build script
const BOARD_CONFIG: &str = include_str!("../display.toml");

/// Scheduler period of the session loop
const TICK_MS: u64 = 10;

/// Page-advance button on PA1, wired to ground
struct PageButton(Input<'static>);

impl InputPin for PageButton {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("EspMon display firmware starting...");

    let p = embassy_stm32::init(Default::default());

    let config = match parse_session_config(BOARD_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("display.toml rejected ({}), using defaults", e);
            SessionConfig::default()
        }
    };
    info!("config: {}", config);

    // Setup I2C for OLED (PB6=SCL, PB7=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);

    let mut panel = Sh1106::new(i2c);
    match panel.init() {
        Ok(()) => info!("OLED initialized"),
        Err(e) => error!("Failed to initialize display: {}", e),
    }

    #[cfg(not(feature = "simulated-link"))]
    let link = {
        static TX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
        static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

        // Setup UART for the host link (PA2=TX, PA3=RX)
        let mut uart_config = usart::Config::default();
        uart_config.baudrate = config.baudrate;

        let uart = unwrap!(BufferedUart::new(
            p.USART2,
            p.PA3, // RX
            p.PA2, // TX
            TX_BUF.init([0; 32]),
            RX_BUF.init([0; 256]),
            Irqs,
            uart_config,
        ));
        info!("UART ready at {} baud", config.baudrate);
        IoTransport::new(uart)
    };

    #[cfg(feature = "simulated-link")]
    let link = {
        info!("using simulated producer");
        espmon_protocol::SimulatedLink::new(Instant::now().as_ticks() as u32)
    };

    let button = ButtonInput::active_low(PageButton(Input::new(p.PA1, Pull::Up)));

    unwrap!(spawner.spawn(session_task(link, panel, button, config)));
    info!("All tasks spawned");
}

/// Session loop: input, link, render
#[embassy_executor::task]
async fn session_task(
    link: Link,
    mut panel: Panel,
    mut button: ButtonInput<PageButton>,
    config: SessionConfig,
) {
    info!("Session task started");

    let mut screen = DisplaySession::for_height(sh1106::HEIGHT as u32);
    let mut session = SessionController::new(link, Delay, config);
    session.start(&mut screen);

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        session.poll_input(&mut button);

        let report = session.poll(Instant::now().as_millis(), &mut screen);
        if report.frames > 0 {
            trace!("{} frames", report.frames);
        }
        if let Some(transition) = report.transition {
            info!("link {}", transition);
        }

        if let Err(e) = present(&mut screen, &mut panel) {
            warn!("display update failed: {}", e);
        }

        ticker.next().await;
    }
}
