use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};

use crate::digital::Motor;
use crate::error::Error;
use crate::fmt::{debug, warn};
use crate::pins::{Gpio, PinId};

/// Two independently driven motors.
///
/// Timed movements hold the calling task for the whole duration and then
/// switch the motors off again. Dropping a timed movement while it waits
/// leaves its motors running; call [`stop`](Self::stop) afterwards.
pub struct DualMotorRobot<'a, M: RawMutex, G: Gpio> {
    left: Motor<'a, M, G>,
    right: Motor<'a, M, G>,
}

impl<'a, M: RawMutex, G: Gpio> DualMotorRobot<'a, M, G> {
    pub fn new(gpio: &'a G, left: Option<PinId>, right: Option<PinId>) -> Result<Self, Error<G::Error>> {
        let (Some(left), Some(right)) = (left, right) else {
            return Err(Error::Configuration("left and right motor pins must be provided"));
        };
        Ok(Self {
            left: Motor::new(gpio, left)?,
            right: Motor::new(gpio, right)?,
        })
    }

    pub async fn left(&self, duration: Option<Duration>) -> Result<(), Error<G::Error>> {
        Self::run_motor(&self.left, duration).await
    }

    pub async fn right(&self, duration: Option<Duration>) -> Result<(), Error<G::Error>> {
        Self::run_motor(&self.right, duration).await
    }

    pub async fn forwards(&self, duration: Option<Duration>) -> Result<(), Error<G::Error>> {
        debug!("robot: forwards for {:?}", duration);
        let started = match self.left.on().await {
            Ok(()) => self.right.on().await,
            failed => failed,
        };
        if let Err(err) = started {
            // Never leave one side driving on its own.
            warn!("robot: forwards failed on {:?}, stopping", err.pin());
            if let Err(stop_err) = self.stop().await {
                warn!("robot: stop after failed start also failed: {:?}", stop_err);
            }
            return Err(err);
        }
        if let Some(duration) = duration {
            Timer::after(duration).await;
            self.stop().await?;
        }
        Ok(())
    }

    /// Switch both motors off. The right motor is switched off even if the
    /// left one fails; the first error is returned.
    pub async fn stop(&self) -> Result<(), Error<G::Error>> {
        let left = self.left.off().await;
        let right = self.right.off().await;
        left.and(right)
    }

    pub fn left_motor(&self) -> &Motor<'a, M, G> {
        &self.left
    }

    pub fn right_motor(&self) -> &Motor<'a, M, G> {
        &self.right
    }

    async fn run_motor(motor: &Motor<'a, M, G>, duration: Option<Duration>) -> Result<(), Error<G::Error>> {
        debug!("robot: {:?} on for {:?}", motor.pin(), duration);
        motor.on().await?;
        if let Some(duration) = duration {
            Timer::after(duration).await;
            motor.off().await?;
        }
        Ok(())
    }
}
