//! TB6612FNG motor driver binding
//!
//! Implements the core's [`MotorDriver`] on top of the `tb6612fng` crate.
//!
//! # Channel mapping
//! The TB6612FNG takes one PWM input plus two direction pins per motor, so a
//! channel pair becomes:
//! - forward > 0: `Forward(percent)`
//! - reverse > 0: `Backward(percent)`
//! - both 0: `Stop` (coast, both direction pins low)
//!
//! Duty is scaled from the configured PWM full scale to the driver's 0-100 %.
//!
//! # Standby
//! The core's gate is "driver enabled", which is the inverse of the chip's
//! standby mode: asserting the gate takes the chip out of standby.

use defmt::Format;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::Pwm;
use joystick_car::system::motor::{Axis, ChannelPair, MotorDriver};
use tb6612fng::{DriveCommand, Tb6612fng};

/// Concrete driver type used on the car
pub type CarDriver = Tb6612fng<
    Output<'static>,
    Output<'static>,
    Pwm<'static>,
    Output<'static>,
    Output<'static>,
    Pwm<'static>,
    Output<'static>,
>;

/// Failed driver write
#[derive(Debug, Clone, Copy, PartialEq, Format)]
pub enum DriveFault {
    /// Direction pin or PWM write failed
    Motor(Axis),
    /// Standby pin write failed
    Standby,
}

/// [`MotorDriver`] adapter for the TB6612FNG
pub struct Tb6612Drive {
    control: CarDriver,
    full_scale: u16,
}

impl Tb6612Drive {
    pub fn new(control: CarDriver, full_scale: u16) -> Self {
        Self {
            control,
            full_scale: full_scale.max(1),
        }
    }

    /// Duty as percentage of the full scale, 0-100
    fn percent(&self, duty: u16) -> u8 {
        let percent = u32::from(duty) * 100 / u32::from(self.full_scale);
        percent.min(100) as u8
    }
}

impl MotorDriver for Tb6612Drive {
    type Error = DriveFault;

    fn write_channels(&mut self, axis: Axis, channels: ChannelPair) -> Result<(), DriveFault> {
        let command = if channels.forward > 0 {
            DriveCommand::Forward(self.percent(channels.forward))
        } else if channels.reverse > 0 {
            DriveCommand::Backward(self.percent(channels.reverse))
        } else {
            DriveCommand::Stop
        };

        let motor_result = match axis {
            Axis::A => self.control.motor_a.drive(command).map_err(|_| ()),
            Axis::B => self.control.motor_b.drive(command).map_err(|_| ()),
        };
        motor_result.map_err(|_| DriveFault::Motor(axis))
    }

    fn set_standby_gate(&mut self, enabled: bool) -> Result<(), DriveFault> {
        let result = if enabled {
            self.control.disable_standby()
        } else {
            self.control.enable_standby()
        };
        result.map_err(|_| DriveFault::Standby)
    }
}
