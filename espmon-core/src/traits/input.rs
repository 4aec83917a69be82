//! Page-advance input

use espmon_hal::InputPin;

/// Source of "show the next page" gestures
pub trait InputSource {
    /// True once per completed gesture
    fn poll_page_advance(&mut self) -> bool;
}

/// Push button on a GPIO
///
/// Fires on release after a press, like a touch tap.
#[derive(Debug)]
pub struct ButtonInput<P> {
    pin: P,
    active_low: bool,
    pressed: bool,
}

impl<P: InputPin> ButtonInput<P> {
    /// Button pulling the pin high when pressed
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
            pressed: false,
        }
    }

    /// Button pulling the pin low when pressed (pull-up wiring)
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
            pressed: false,
        }
    }

    fn is_down(&self) -> bool {
        if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        }
    }
}

impl<P: InputPin> InputSource for ButtonInput<P> {
    fn poll_page_advance(&mut self) -> bool {
        if self.is_down() {
            self.pressed = true;
            return false;
        }
        let released = self.pressed;
        self.pressed = false;
        released
    }
}
