use portable_atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::pins::{Gpio, PinHandle, PinId, PinMode};

/// A pin driven as a plain on/off output.
///
/// The backend has no read-back, so the device remembers the level of the
/// last successful write. A fresh device is considered off.
pub struct OutputDevice<'a, G: Gpio> {
    pin: PinHandle<'a, G>,
    active: AtomicBool,
}

impl<'a, G: Gpio> OutputDevice<'a, G> {
    /// Configures `pin` as an output. Nothing is written yet.
    pub fn new(gpio: &'a G, pin: PinId) -> Result<Self, Error<G::Error>> {
        let pin = PinHandle::new(gpio, pin);
        pin.configure(PinMode::Output)?;
        Ok(Self {
            pin,
            active: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn on(&self) -> Result<(), Error<G::Error>> {
        self.set(true)
    }

    #[inline]
    pub fn off(&self) -> Result<(), Error<G::Error>> {
        self.set(false)
    }

    /// Drive the pin; the remembered state only changes if the write succeeds.
    pub fn set(&self, active: bool) -> Result<(), Error<G::Error>> {
        self.pin.write(active)?;
        self.active.store(active, Ordering::Release);
        Ok(())
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    #[inline]
    pub fn pin(&self) -> PinId {
        self.pin.id()
    }
}
