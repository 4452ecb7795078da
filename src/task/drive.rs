//! Drive Task Module
//!
//! Owns the drive controller and runs the single control loop of the car.
//! Every pass drains the command queue, then runs one controller tick, then
//! waits for the next control period. The controller itself decides when a
//! ramp tick is due, so the period only needs to be finer than the ramp
//! interval.

use crate::task::link;
use crate::task::motor_driver::Tb6612Drive;
use crate::task::resources::MotorDriverResources;
use defmt::{error, info};
use embassy_rp::gpio;
use embassy_rp::pwm;
use embassy_time::{Duration, Instant, Ticker};
use joystick_car::system::config::RampConfig;
use joystick_car::system::controller::DriveController;
use tb6612fng::{Motor, Tb6612fng};

/// Scheduler pass period
const CONTROL_PERIOD: Duration = Duration::from_millis(5);

/// H-bridge switching frequency
const PWM_FREQ_HZ: u32 = 10_000;

/// PWM slice setup for the given switching frequency
///
/// Picks the smallest clock divider that keeps the counter top within 16 bits.
fn pwm_config(freq_hz: u32) -> pwm::Config {
    let sys_hz = embassy_rp::clocks::clk_sys_freq();
    let counts = sys_hz / freq_hz;
    let divider = (counts / (u16::MAX as u32 + 1) + 1) as u8;

    let mut config = pwm::Config::default();
    config.divider = divider.into();
    config.top = (counts / divider as u32).saturating_sub(1) as u16;
    config
}

#[embassy_executor::task]
pub async fn drive(r: MotorDriverResources) {
    let slice_config = pwm_config(PWM_FREQ_HZ);

    let stby = gpio::Output::new(r.standby_pin, gpio::Level::Low);

    // motor A, throttle
    let throttle_fwd = gpio::Output::new(r.throttle_forward_pin, gpio::Level::Low);
    let throttle_bckw = gpio::Output::new(r.throttle_backward_pin, gpio::Level::Low);
    let throttle_pwm =
        pwm::Pwm::new_output_a(r.throttle_slice, r.throttle_pwm_pin, slice_config.clone());
    let Ok(throttle_motor) = Motor::new(throttle_fwd, throttle_bckw, throttle_pwm) else {
        error!("throttle motor init failed");
        return;
    };

    // motor B, steering
    let steer_fwd = gpio::Output::new(r.steer_forward_pin, gpio::Level::Low);
    let steer_bckw = gpio::Output::new(r.steer_backward_pin, gpio::Level::Low);
    let steer_pwm = pwm::Pwm::new_output_b(r.steer_slice, r.steer_pwm_pin, slice_config);
    let Ok(steer_motor) = Motor::new(steer_fwd, steer_bckw, steer_pwm) else {
        error!("steering motor init failed");
        return;
    };

    let Ok(control) = Tb6612fng::new(throttle_motor, steer_motor, stby) else {
        error!("motor driver init failed");
        return;
    };

    let config = RampConfig::default();
    let driver = Tb6612Drive::new(control, config.pwm_full_scale);
    let mut controller =
        match DriveController::new(config, driver, link::status_publisher(), Instant::now()) {
            Ok(controller) => controller,
            Err(e) => {
                error!("invalid drive configuration: {}", e);
                return;
            }
        };

    info!("drive loop running");
    let mut ticker = Ticker::every(CONTROL_PERIOD);
    loop {
        while let Some(command) = link::try_next_command() {
            controller.ingest(command, Instant::now());
        }
        controller.tick(Instant::now());
        ticker.next().await;
    }
}
