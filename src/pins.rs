use core::fmt;

use crate::error::{Error, HardwareFault};
use crate::fmt::trace;

/// Identifier of a single digital line, as understood by the [`Gpio`] backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

impl From<u8> for PinId {
    fn from(value: u8) -> Self {
        PinId(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

/// The hardware capability every device is built on.
///
/// A single backend instance is shared by all devices and their blink
/// runners, so both operations take `&self`; backends keep whatever
/// interior mutability the hardware access needs.
pub trait Gpio {
    type Error: HardwareFault;

    fn set_pin_mode(&self, pin: PinId, mode: PinMode) -> Result<(), Self::Error>;

    fn write_pin(&self, pin: PinId, high: bool) -> Result<(), Self::Error>;
}

/// One pin of a [`Gpio`] backend.
pub struct PinHandle<'a, G: Gpio> {
    gpio: &'a G,
    id: PinId,
}

impl<'a, G: Gpio> PinHandle<'a, G> {
    pub fn new(gpio: &'a G, id: PinId) -> Self {
        Self { gpio, id }
    }

    #[inline]
    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn configure(&self, mode: PinMode) -> Result<(), Error<G::Error>> {
        trace!("{:?}: mode {:?}", self.id, mode);
        self.gpio
            .set_pin_mode(self.id, mode)
            .map_err(|error| Error::Hardware { pin: self.id, error })
    }

    pub fn write(&self, high: bool) -> Result<(), Error<G::Error>> {
        trace!("{:?}: write {:?}", self.id, high);
        self.gpio
            .write_pin(self.id, high)
            .map_err(|error| Error::Hardware { pin: self.id, error })
    }
}
