#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;

use digital_outputs::{DigitalOutputDevice, DualMotorRobot, Gpio, PinId, PinMode};
use embassy_futures::block_on;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

pub type TestDevice<'a> = DigitalOutputDevice<'a, CriticalSectionRawMutex, MockGpio>;
pub type TestRobot<'a> = DualMotorRobot<'a, CriticalSectionRawMutex, MockGpio>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    NotAnOutput(PinId),
    Injected(PinId),
}

#[derive(Debug, Clone, Copy)]
pub struct Write {
    pub pin: PinId,
    pub high: bool,
    pub at: Instant,
}

#[derive(Default)]
struct Lines {
    modes: HashMap<PinId, PinMode>,
    levels: HashMap<PinId, bool>,
    writes: Vec<Write>,
    fail_next: HashSet<PinId>,
}

/// Records every write; writes to lines not configured as outputs fail.
pub struct MockGpio {
    lines: Mutex<CriticalSectionRawMutex, RefCell<Lines>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(RefCell::new(Lines::default())),
        }
    }

    pub fn mode(&self, pin: PinId) -> Option<PinMode> {
        self.lines.lock(|lines| lines.borrow().modes.get(&pin).copied())
    }

    pub fn level(&self, pin: PinId) -> Option<bool> {
        self.lines.lock(|lines| lines.borrow().levels.get(&pin).copied())
    }

    pub fn writes(&self, pin: PinId) -> Vec<Write> {
        self.lines.lock(|lines| lines.borrow().writes.iter().filter(|w| w.pin == pin).copied().collect())
    }

    pub fn levels_written(&self, pin: PinId) -> Vec<bool> {
        self.writes(pin).into_iter().map(|w| w.high).collect()
    }

    pub fn write_count(&self, pin: PinId) -> usize {
        self.writes(pin).len()
    }

    /// Make the next write to `pin` fail, once.
    pub fn fail_next_write(&self, pin: PinId) {
        self.lines.lock(|lines| {
            lines.borrow_mut().fail_next.insert(pin);
        });
    }
}

impl Gpio for MockGpio {
    type Error = MockError;

    fn set_pin_mode(&self, pin: PinId, mode: PinMode) -> Result<(), MockError> {
        self.lines.lock(|lines| {
            lines.borrow_mut().modes.insert(pin, mode);
        });
        Ok(())
    }

    fn write_pin(&self, pin: PinId, high: bool) -> Result<(), MockError> {
        self.lines.lock(|lines| {
            let mut lines = lines.borrow_mut();
            if lines.modes.get(&pin) != Some(&PinMode::Output) {
                return Err(MockError::NotAnOutput(pin));
            }
            if lines.fail_next.remove(&pin) {
                return Err(MockError::Injected(pin));
            }
            lines.levels.insert(pin, high);
            lines.writes.push(Write {
                pin,
                high,
                at: Instant::now(),
            });
            Ok(())
        })
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs `scenario` while the device's blink runner is polled alongside it.
pub fn with_runner<F: Future>(device: &TestDevice<'_>, scenario: F) -> F::Output {
    init_logger();
    block_on(async {
        match select(device.runner().run(), scenario).await {
            Either::First(never) => never,
            Either::Second(output) => output,
        }
    })
}
