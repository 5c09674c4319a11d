// RP chip implementations
use core::cell::RefCell;

use embassy_rp::gpio::Flex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::pins::{Gpio, PinId, PinMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum RpGpioError {
    UnknownPin(PinId),
}

/// A fixed table of RP2040 lines, addressed by the [`PinId`] they were
/// registered under.
pub struct RpGpio<const N: usize> {
    lines: Mutex<CriticalSectionRawMutex, RefCell<[(PinId, Flex<'static>); N]>>,
}

impl<const N: usize> RpGpio<N> {
    pub fn new(lines: [(PinId, Flex<'static>); N]) -> Self {
        Self {
            lines: Mutex::new(RefCell::new(lines)),
        }
    }

    fn with_line<R>(&self, pin: PinId, f: impl FnOnce(&mut Flex<'static>) -> R) -> Result<R, RpGpioError> {
        self.lines.lock(|lines| {
            lines
                .borrow_mut()
                .iter_mut()
                .find(|(id, _)| *id == pin)
                .map(|(_, line)| f(line))
                .ok_or(RpGpioError::UnknownPin(pin))
        })
    }
}

impl<const N: usize> Gpio for RpGpio<N> {
    type Error = RpGpioError;

    fn set_pin_mode(&self, pin: PinId, mode: PinMode) -> Result<(), Self::Error> {
        self.with_line(pin, |line| match mode {
            PinMode::Input => line.set_as_input(),
            PinMode::Output => {
                line.set_low();
                line.set_as_output();
            }
        })
    }

    fn write_pin(&self, pin: PinId, high: bool) -> Result<(), Self::Error> {
        self.with_line(pin, |line| {
            if high {
                line.set_high();
            } else {
                line.set_low();
            }
        })
    }
}
