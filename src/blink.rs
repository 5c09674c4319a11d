use core::cell::Cell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use crate::error::Error;
use crate::fmt::{debug, error};
use crate::output::OutputDevice;
use crate::pins::Gpio;

pub const DEFAULT_ON_TIME: Duration = Duration::from_secs(1);
pub const DEFAULT_OFF_TIME: Duration = Duration::from_secs(1);

/// How long a blinking device stays on, then off, per cycle.
///
/// A zero duration means the next write follows without rest; the loop
/// still yields to the executor between writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTiming {
    pub on: Duration,
    pub off: Duration,
}

impl BlinkTiming {
    pub const fn new(on: Duration, off: Duration) -> Self {
        Self { on, off }
    }

    /// Equal on and off phases.
    pub const fn even(phase: Duration) -> Self {
        Self::new(phase, phase)
    }
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self::new(DEFAULT_ON_TIME, DEFAULT_OFF_TIME)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    Idle,
    Blinking,
    /// The blink loop hit a write error and exited. The fault is handed to
    /// whichever device call stops the blink next.
    Faulted,
}

#[derive(Clone, Copy)]
enum Command {
    Start { generation: u32, timing: BlinkTiming },
    Stop { generation: u32 },
}

/// Why a blink loop ended without a fault.
enum Ending {
    Stopped,
    /// A start for a newer loop arrived in place of the stop.
    Replaced(Command),
}

#[derive(Clone, Copy)]
struct Lifecycle {
    state: BlinkState,
    generation: u32,
}

/// Lifecycle of the blink loop of one device.
///
/// The controller only carries signals and state; the loop itself executes
/// inside the device's [`BlinkRunner`]. Each loop gets a generation number.
/// Stop requests and the runner's exit acknowledgements carry it, so an
/// acknowledgement left behind by an abandoned stop can never be taken for
/// the exit of a later loop.
pub struct BlinkController<M: RawMutex, E> {
    command: Signal<M, Command>,
    exited: Signal<M, (u32, Result<(), Error<E>>)>,
    lifecycle: BlockingMutex<M, Cell<Lifecycle>>,
}

impl<M: RawMutex, E> BlinkController<M, E> {
    pub(crate) fn new() -> Self {
        Self {
            command: Signal::new(),
            exited: Signal::new(),
            lifecycle: BlockingMutex::new(Cell::new(Lifecycle {
                state: BlinkState::Idle,
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> BlinkState {
        self.lifecycle.lock(|lifecycle| lifecycle.get().state)
    }

    /// Hand a new blink loop to the runner.
    ///
    /// Any previous loop must already have been stopped; the owning device
    /// guarantees this by holding its lock across stop and start.
    pub(crate) fn start(&self, timing: BlinkTiming) {
        let generation = self.lifecycle.lock(|lifecycle| {
            let current = lifecycle.get();
            debug_assert_eq!(current.state, BlinkState::Idle);
            let generation = current.generation.wrapping_add(1);
            lifecycle.set(Lifecycle {
                state: BlinkState::Blinking,
                generation,
            });
            generation
        });
        self.command.signal(Command::Start { generation, timing });
    }

    /// Cancel the blink loop and wait until the runner confirms it exited.
    ///
    /// Returns immediately when nothing is running. A write fault that ended
    /// the loop early is returned here. Dropping the future before it
    /// completes leaves the controller active; the next stop joins the same
    /// loop. A fault already handed to the dropped call is not reported again.
    pub(crate) async fn stop(&self) -> Result<(), Error<E>> {
        let current = self.lifecycle.lock(|lifecycle| lifecycle.get());
        if current.state == BlinkState::Idle {
            return Ok(());
        }
        self.command.signal(Command::Stop {
            generation: current.generation,
        });
        loop {
            let (generation, outcome) = self.exited.wait().await;
            if generation == current.generation {
                self.lifecycle.lock(|lifecycle| {
                    lifecycle.set(Lifecycle {
                        state: BlinkState::Idle,
                        generation,
                    })
                });
                return outcome;
            }
        }
    }

    fn mark_faulted(&self, generation: u32) {
        self.lifecycle.lock(|lifecycle| {
            let current = lifecycle.get();
            if current.generation == generation && current.state == BlinkState::Blinking {
                lifecycle.set(Lifecycle {
                    state: BlinkState::Faulted,
                    generation,
                });
            }
        });
    }
}

/// Executes the blink loops of one device. Must be polled for as long as
/// the device may blink.
pub struct BlinkRunner<'d, 'a, M: RawMutex, G: Gpio> {
    output: &'d OutputDevice<'a, G>,
    controller: &'d BlinkController<M, G::Error>,
}

impl<'d, 'a, M: RawMutex, G: Gpio> BlinkRunner<'d, 'a, M, G> {
    pub(crate) fn new(output: &'d OutputDevice<'a, G>, controller: &'d BlinkController<M, G::Error>) -> Self {
        Self { output, controller }
    }

    pub async fn run(self) -> ! {
        let pin = self.output.pin();
        debug!("{:?}: blink runner ready", pin);

        let mut fault = None;
        let mut pending = None;
        loop {
            let command = match pending.take() {
                Some(command) => command,
                None => self.controller.command.wait().await,
            };
            match command {
                Command::Start { generation, timing } => {
                    debug!("{:?}: blink #{:?} on {:?} off {:?}", pin, generation, timing.on, timing.off);
                    match self.blink(generation, timing).await {
                        Ok(ending) => {
                            debug!("{:?}: blink #{:?} stopped", pin, generation);
                            self.controller.exited.signal((generation, Ok(())));
                            if let Ending::Replaced(start) = ending {
                                pending = Some(start);
                            }
                        }
                        Err(err) => {
                            error!("{:?}: blink #{:?} aborted: {:?}", pin, generation, err);
                            self.controller.mark_faulted(generation);
                            fault = Some((generation, err));
                        }
                    }
                }
                // No loop is running: it already faulted, the stop overtook
                // a start that never ran, or an earlier stop was repeated.
                Command::Stop { generation } => {
                    let outcome = match fault.take() {
                        Some((failed, err)) if failed == generation => Err(err),
                        other => {
                            fault = other;
                            Ok(())
                        }
                    };
                    self.controller.exited.signal((generation, outcome));
                }
            }
        }
    }

    async fn blink(&self, generation: u32, timing: BlinkTiming) -> Result<Ending, Error<G::Error>> {
        loop {
            self.output.on()?;
            if let Some(ending) = self.rest(generation, timing.on).await {
                return Ok(ending);
            }
            self.output.off()?;
            if let Some(ending) = self.rest(generation, timing.off).await {
                return Ok(ending);
            }
        }
    }

    /// Wait out one phase, or return early with the reason the loop must end.
    async fn rest(&self, generation: u32, period: Duration) -> Option<Ending> {
        let deadline = Instant::now() + period;
        loop {
            match select(self.controller.command.wait(), Timer::at(deadline)).await {
                Either::First(Command::Stop { generation: target }) if target == generation => {
                    return Some(Ending::Stopped)
                }
                // Repeated stop of an older loop.
                Either::First(Command::Stop { .. }) => continue,
                Either::First(start @ Command::Start { .. }) => return Some(Ending::Replaced(start)),
                Either::Second(()) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_is_one_second_each_way() {
        let timing = BlinkTiming::default();
        assert_eq!(timing.on, Duration::from_secs(1));
        assert_eq!(timing.off, Duration::from_secs(1));

        let quarter = Duration::from_millis(250);
        assert_eq!(BlinkTiming::even(quarter), BlinkTiming::new(quarter, quarter));
    }
}
