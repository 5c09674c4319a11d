use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use crate::blink::{BlinkController, BlinkRunner, BlinkState, BlinkTiming};
use crate::error::Error;
use crate::fmt::{debug, warn};
use crate::output::OutputDevice;
use crate::pins::{Gpio, PinId};

/// An on/off output that can also blink in the background.
///
/// Direct state changes always stop the blink loop first and only write once
/// the runner has confirmed it exited, so a blink can never undo an `on()` or
/// `off()`. All state changes of one device are serialized by its lock; this
/// also makes the read-decide-write of [`toggle`](Self::toggle) atomic.
pub struct DigitalOutputDevice<'a, M: RawMutex, G: Gpio> {
    output: OutputDevice<'a, G>,
    blinker: BlinkController<M, G::Error>,
    lock: Mutex<M, ()>,
}

pub type Led<'a, M, G> = DigitalOutputDevice<'a, M, G>;
pub type Buzzer<'a, M, G> = DigitalOutputDevice<'a, M, G>;
pub type Motor<'a, M, G> = DigitalOutputDevice<'a, M, G>;

impl<'a, M: RawMutex, G: Gpio> DigitalOutputDevice<'a, M, G> {
    pub fn new(gpio: &'a G, pin: PinId) -> Result<Self, Error<G::Error>> {
        Ok(Self {
            output: OutputDevice::new(gpio, pin)?,
            blinker: BlinkController::new(),
            lock: Mutex::new(()),
        })
    }

    /// The future that executes this device's blink loops.
    pub fn runner(&self) -> BlinkRunner<'_, 'a, M, G> {
        BlinkRunner::new(&self.output, &self.blinker)
    }

    pub async fn on(&self) -> Result<(), Error<G::Error>> {
        let _guard = self.lock.lock().await;
        self.halt_blink().await?;
        self.output.on()
    }

    pub async fn off(&self) -> Result<(), Error<G::Error>> {
        let _guard = self.lock.lock().await;
        self.halt_blink().await?;
        self.output.off()
    }

    /// Invert the current state. Concurrent callers are served one at a time,
    /// each seeing the state the previous one left behind.
    pub async fn toggle(&self) -> Result<(), Error<G::Error>> {
        let _guard = self.lock.lock().await;
        self.halt_blink().await?;
        self.output.set(!self.output.is_active())
    }

    /// Start blinking, replacing any blink already running. The new cadence
    /// always begins with the "on" phase.
    pub async fn blink(&self, timing: BlinkTiming) -> Result<(), Error<G::Error>> {
        let _guard = self.lock.lock().await;
        self.halt_blink().await?;
        self.blinker.start(timing);
        Ok(())
    }

    pub async fn blink_default(&self) -> Result<(), Error<G::Error>> {
        self.blink(BlinkTiming::default()).await
    }

    /// Stop blinking and leave the pin wherever the loop left it.
    pub async fn stop(&self) -> Result<(), Error<G::Error>> {
        let _guard = self.lock.lock().await;
        self.halt_blink().await
    }

    async fn halt_blink(&self) -> Result<(), Error<G::Error>> {
        if self.blinker.state() == BlinkState::Idle {
            return Ok(());
        }
        debug!("{:?}: stopping blink", self.pin());
        self.blinker.stop().await.inspect_err(|err| {
            warn!("{:?}: blink had failed: {:?}", self.pin(), err);
        })
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.output.is_active()
    }

    #[inline]
    pub fn is_blinking(&self) -> bool {
        self.blinker.state() == BlinkState::Blinking
    }

    #[inline]
    pub fn blink_state(&self) -> BlinkState {
        self.blinker.state()
    }

    #[inline]
    pub fn pin(&self) -> PinId {
        self.output.pin()
    }
}
