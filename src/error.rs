use core::fmt::Debug;

use crate::pins::PinId;

/// Bound on the error type of a [`Gpio`](crate::Gpio) backend, so faults can
/// be logged whichever logging backend is enabled.
#[cfg(feature = "defmt")]
pub trait HardwareFault: Debug + defmt::Format {}

#[cfg(feature = "defmt")]
impl<T: Debug + defmt::Format> HardwareFault for T {}

/// Bound on the error type of a [`Gpio`](crate::Gpio) backend, so faults can
/// be logged whichever logging backend is enabled.
#[cfg(not(feature = "defmt"))]
pub trait HardwareFault: Debug {}

#[cfg(not(feature = "defmt"))]
impl<T: Debug> HardwareFault for T {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A device was built from an incomplete or inconsistent description.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),
    /// The GPIO backend refused to configure or drive a pin.
    #[error("hardware fault on {pin}: {error:?}")]
    Hardware { pin: PinId, error: E },
}

impl<E> Error<E> {
    pub fn pin(&self) -> Option<PinId> {
        match self {
            Error::Configuration(_) => None,
            Error::Hardware { pin, .. } => Some(*pin),
        }
    }
}
