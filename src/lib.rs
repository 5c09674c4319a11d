//! Digital output devices (LEDs, buzzers, motors) on top of a minimal GPIO
//! capability, with a cancellable background blink loop per device.
//!
//! Every [`DigitalOutputDevice`] comes with a [`BlinkRunner`] that must be
//! driven by the executor (spawned as a task on firmware, `select`ed next to
//! the application future elsewhere). The runner stays idle until
//! [`DigitalOutputDevice::blink`] hands it a cadence.
#![cfg_attr(not(test), no_std)]

pub(crate) mod fmt;

pub mod blink;
pub mod digital;
pub mod error;
pub mod output;
pub mod pins;
pub mod robot;

#[cfg(feature = "rp2040")]
pub mod rp;

pub use blink::{BlinkController, BlinkRunner, BlinkState, BlinkTiming, DEFAULT_OFF_TIME, DEFAULT_ON_TIME};
pub use digital::{Buzzer, DigitalOutputDevice, Led, Motor};
pub use error::{Error, HardwareFault};
pub use output::OutputDevice;
pub use pins::{Gpio, PinHandle, PinId, PinMode};
pub use robot::DualMotorRobot;
