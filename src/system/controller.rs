//! Drive Controller
//!
//! Owns the two motor axes, the controller state, the motor driver and the
//! status sink. The control loop calls [`DriveController::ingest`] for every
//! decoded command and [`DriveController::tick`] on every scheduler pass,
//! injecting the current time into both.
//!
//! # Tick sequence
//! 1. Skip unless a full ramp interval has passed
//! 2. Command timeout: stop hard, release the gate, skip the rest
//! 3. Idle standby: release the gate after a long rest
//! 4. Advance both axes one step towards their targets, note when they
//!    come to rest
//! 5. Apply gate and channels to the driver
//! 6. Publish a status report
//!
//! Targets are only written by ingestion, currents only by the tick (and the
//! stop paths), hardware only by the tick and the emergency stop.

use embassy_time::Instant;

use crate::system::axis::MotorAxis;
use crate::system::command::Command;
use crate::system::config::{ConfigError, RampConfig};
use crate::system::motor::{Axis, ChannelPair, MotorDriver};
use crate::system::safety;
use crate::system::state::{ControllerState, OperationMode};
use crate::system::status::{StatusReport, StatusSink};

#[cfg(feature = "defmt")]
use defmt::Format;

/// What a call to [`DriveController::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum TickOutcome {
    /// Ramp interval not yet elapsed, nothing happened
    Waiting,
    /// Axes advanced, hardware written, status published
    Ramped,
    /// Command timeout in force, motors stopped, no status published
    TimedOut,
}

/// Ramp engine, safety supervisor and status reporter for two motor axes
pub struct DriveController<D, S> {
    config: RampConfig,
    throttle: MotorAxis,
    steer: MotorAxis,
    state: ControllerState,
    driver: D,
    sink: S,
    /// Gate level last accepted by the driver, None if unknown
    gate_applied: Option<bool>,
}

impl<D, S> DriveController<D, S>
where
    D: MotorDriver,
    S: StatusSink,
{
    /// Creates a controller at rest and puts the hardware into a known state
    ///
    /// Both channel pairs are written off and the standby gate is released.
    pub fn new(config: RampConfig, driver: D, sink: S, now: Instant) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let mut controller = Self {
            config,
            throttle: MotorAxis::new(),
            steer: MotorAxis::new(),
            state: ControllerState::new(now),
            driver,
            sink,
            gate_applied: None,
        };
        controller.halt();
        info!(
            "drive controller ready: max duty {}, step {}",
            config.max_duty,
            config.ramp_step
        );
        Ok(controller)
    }

    /// Applies one decoded command
    ///
    /// Never touches the hardware except for an emergency stop. Every command
    /// re-arms the command timeout.
    pub fn ingest(&mut self, command: Command, now: Instant) {
        match command {
            Command::Mode(mode) => self.set_mode(mode),
            Command::Drive { steer, throttle } => {
                let max_duty = self.config.max_duty;
                let a = self.throttle.set_target(throttle, max_duty);
                let b = self.steer.set_target(steer, max_duty);
                if a != 0 || b != 0 {
                    self.state.touch_activity(now);
                }
                trace!("drive targets A={} B={}", a, b);
            }
            Command::EmergencyStop => self.emergency_stop(),
        }
        self.state.touch_command(now);
    }

    /// Runs one scheduler pass
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if now.saturating_duration_since(self.state.last_ramp) < self.config.ramp_interval {
            return TickOutcome::Waiting;
        }
        self.state.last_ramp = now;

        if safety::command_timed_out(&mut self.state, now, self.config.command_timeout) {
            self.halt();
            return TickOutcome::TimedOut;
        }

        let at_rest = self.throttle.is_at_rest() && self.steer.is_at_rest();
        if safety::idle_standby_due(
            &mut self.state,
            at_rest,
            now,
            self.config.standby_idle_timeout,
        ) {
            info!("motors idle, entering standby");
        }

        let step = self.config.ramp_step;
        self.throttle.advance(step);
        self.steer.advance(step);
        safety::note_rest(
            &mut self.state,
            self.throttle.is_at_rest() && self.steer.is_at_rest(),
            now,
        );

        self.apply_gate();
        self.apply_channels();

        let report = StatusReport::capture(&self.throttle, &self.steer, self.config.debug_status);
        self.sink.publish(&report);
        TickOutcome::Ramped
    }

    /// Stops both motors at once and releases the standby gate
    ///
    /// Unlike a zero drive command this does not ramp down.
    pub fn emergency_stop(&mut self) {
        warn!("emergency stop");
        self.halt();
    }

    pub fn config(&self) -> &RampConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn mode(&self) -> OperationMode {
        self.state.mode
    }

    /// Throttle axis (A)
    pub fn throttle(&self) -> &MotorAxis {
        &self.throttle
    }

    /// Steering axis (B)
    pub fn steer(&self) -> &MotorAxis {
        &self.steer
    }

    /// Whether the standby gate is asserted (driver powered)
    pub fn standby_enabled(&self) -> bool {
        self.state.standby_enabled
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Gives back the driver and the sink
    pub fn release(self) -> (D, S) {
        (self.driver, self.sink)
    }

    fn set_mode(&mut self, mode: OperationMode) {
        if self.state.set_operation_mode(mode) {
            info!("operation mode set to {}", mode.name());
        }
    }

    /// Zeroes both axes, writes the channels off and releases the gate
    fn halt(&mut self) {
        self.throttle.halt();
        self.steer.halt();
        self.state.standby_enabled = false;
        self.apply_channels();
        self.write_gate(false);
    }

    fn apply_channels(&mut self) {
        let max_duty = self.config.max_duty;
        for axis in Axis::ALL {
            let duty = match axis {
                Axis::A => self.throttle.current(),
                Axis::B => self.steer.current(),
            };
            let channels = ChannelPair::from_duty(duty, max_duty);
            if self.driver.write_channels(axis, channels).is_err() {
                warn!("motor driver rejected write on axis {}", axis.name());
            }
        }
    }

    /// Writes the requested gate level if the driver does not have it yet
    fn apply_gate(&mut self) {
        let wanted = self.state.standby_enabled;
        if self.gate_applied != Some(wanted) {
            self.write_gate(wanted);
        }
    }

    fn write_gate(&mut self, enabled: bool) {
        match self.driver.set_standby_gate(enabled) {
            Ok(()) => {
                if self.gate_applied != Some(enabled) {
                    debug!("standby gate {}", if enabled { "asserted" } else { "released" });
                }
                self.gate_applied = Some(enabled);
            }
            Err(_) => {
                warn!("motor driver rejected standby gate write");
                self.gate_applied = None;
            }
        }
    }
}
