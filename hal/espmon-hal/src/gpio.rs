//! GPIO pin abstractions
//!
//! Only digital input is needed: the optional page-advance button.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<P: InputPin + ?Sized> InputPin for &P {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}
