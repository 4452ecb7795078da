#![allow(dead_code)]

use embassy_time::Instant;
use joystick_car::system::config::RampConfig;
use joystick_car::system::controller::DriveController;
use joystick_car::system::motor::{Axis, ChannelPair, MotorDriver};
use joystick_car::system::status::{StatusReport, StatusSink};

/// One hardware write seen by the bench
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Channels(Axis, ChannelPair),
    Gate(bool),
}

/// Motor driver that records every write
#[derive(Debug, Default)]
pub struct BenchDriver {
    pub writes: Vec<Write>,
    pub a: ChannelPair,
    pub b: ChannelPair,
    pub gate: bool,
}

impl MotorDriver for BenchDriver {
    type Error = core::convert::Infallible;

    fn write_channels(&mut self, axis: Axis, channels: ChannelPair) -> Result<(), Self::Error> {
        match axis {
            Axis::A => self.a = channels,
            Axis::B => self.b = channels,
        }
        self.writes.push(Write::Channels(axis, channels));
        Ok(())
    }

    fn set_standby_gate(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.gate = enabled;
        self.writes.push(Write::Gate(enabled));
        Ok(())
    }
}

/// Status sink that keeps every report
#[derive(Debug, Default)]
pub struct Reports(pub Vec<StatusReport>);

impl StatusSink for Reports {
    fn publish(&mut self, report: &StatusReport) {
        self.0.push(report.clone());
    }
}

pub type Car = DriveController<BenchDriver, Reports>;

pub fn ms(value: u64) -> Instant {
    Instant::from_millis(value)
}

/// Controller with the stock tuning, booted at t=0
pub fn car() -> Car {
    car_with(RampConfig::default())
}

pub fn car_with(config: RampConfig) -> Car {
    DriveController::new(config, BenchDriver::default(), Reports::default(), ms(0))
        .expect("valid config")
}
