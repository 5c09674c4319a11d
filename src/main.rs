#![no_std]
#![no_main]

const STATUS_LED_PIN: PinId = PinId(22);
const BUZZER_PIN: PinId = PinId(15);
const DIAG_LED_PIN: PinId = PinId(16);
const LEFT_MOTOR_PIN: PinId = PinId(2);
const RIGHT_MOTOR_PIN: PinId = PinId(3);

const HEARTBEAT: BlinkTiming = BlinkTiming::even(Duration::from_millis(500));
const FAULT_BLINK: BlinkTiming = BlinkTiming::even(Duration::from_millis(100));
const CHIRP: BlinkTiming = BlinkTiming::new(Duration::from_millis(50), Duration::from_millis(950));

const LEG: Duration = Duration::from_secs(2);
const TURN: Duration = Duration::from_millis(700);
const FAULT_BACKOFF: Duration = Duration::from_secs(5);

use {
    defmt::{info, unwrap, warn},
    defmt_rtt as _,
    digital_outputs::{
        rp::{RpGpio, RpGpioError},
        BlinkRunner, BlinkTiming, DigitalOutputDevice, DualMotorRobot, Error, PinId,
    },
    embassy_executor::Spawner,
    embassy_rp::gpio::{AnyPin, Flex},
    embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
    embassy_time::{Duration, Timer},
    panic_probe as _,
    static_cell::StaticCell,
};

type BoardGpio = RpGpio<5>;
type Device = DigitalOutputDevice<'static, CriticalSectionRawMutex, BoardGpio>;
type Robot = DualMotorRobot<'static, CriticalSectionRawMutex, BoardGpio>;
type Runner = BlinkRunner<'static, 'static, CriticalSectionRawMutex, BoardGpio>;

static GPIO: StaticCell<BoardGpio> = StaticCell::new();
static STATUS_LED: StaticCell<Device> = StaticCell::new();
static BUZZER: StaticCell<Device> = StaticCell::new();
static DIAG_LED: StaticCell<Device> = StaticCell::new();
static ROBOT: StaticCell<Robot> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let p = embassy_rp::init(Default::default());

    let gpio: &'static BoardGpio = GPIO.init(RpGpio::new([
        (STATUS_LED_PIN, Flex::new(AnyPin::from(p.PIN_22))),
        (BUZZER_PIN, Flex::new(p.PIN_15)),
        (DIAG_LED_PIN, Flex::new(p.PIN_16)),
        (LEFT_MOTOR_PIN, Flex::new(p.PIN_2)),
        (RIGHT_MOTOR_PIN, Flex::new(p.PIN_3)),
    ]));

    let status: &'static Device = STATUS_LED.init(unwrap!(Device::new(gpio, STATUS_LED_PIN)));
    let buzzer: &'static Device = BUZZER.init(unwrap!(Device::new(gpio, BUZZER_PIN)));
    let diag: &'static Device = DIAG_LED.init(unwrap!(Device::new(gpio, DIAG_LED_PIN)));
    let robot: &'static Robot = ROBOT.init(unwrap!(Robot::new(
        gpio,
        Some(LEFT_MOTOR_PIN),
        Some(RIGHT_MOTOR_PIN)
    )));

    spawner.must_spawn(blink_task(status.runner()));
    spawner.must_spawn(blink_task(buzzer.runner()));
    info!("Blink runners started");
    unwrap!(diag.on().await);

    unwrap!(status.blink(HEARTBEAT).await);

    loop {
        match patrol(robot, buzzer).await {
            Ok(()) => info!("Patrol lap done"),
            Err(err) => {
                warn!("Patrol interrupted: {:?}", err);
                if let Err(err) = robot.stop().await {
                    warn!("Motors did not stop: {:?}", err);
                }
                if let Err(err) = status.blink(FAULT_BLINK).await {
                    warn!("Status LED failed: {:?}", err);
                }
                Timer::after(FAULT_BACKOFF).await;
                if let Err(err) = status.blink(HEARTBEAT).await {
                    warn!("Status LED failed: {:?}", err);
                }
            }
        }
    }
}

async fn patrol(robot: &Robot, buzzer: &Device) -> Result<(), Error<RpGpioError>> {
    buzzer.blink(CHIRP).await?;
    robot.forwards(Some(LEG)).await?;
    buzzer.off().await?;
    robot.left(Some(TURN)).await?;
    robot.forwards(Some(LEG)).await?;
    robot.right(Some(TURN)).await?;
    Ok(())
}

#[embassy_executor::task(pool_size = 2)]
async fn blink_task(runner: Runner) -> ! {
    runner.run().await
}
