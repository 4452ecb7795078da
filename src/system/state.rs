//! Controller State
//!
//! Bookkeeping shared by command ingestion, the ramp engine and the safety
//! supervisor:
//! - Operation mode (Manual/Auto)
//! - Command and activity timestamps
//! - Standby gate status
//!
//! The state is owned by the drive controller and only ever touched through
//! `&mut` access from the single control loop, so it needs no locking.
//!
//! # Timestamps
//! - `last_command`: any valid command, keeps the command timeout from firing
//! - `last_activity`: any non-zero target, keeps the standby gate asserted
//! - `rest_since`: tick at which both axes came to rest

use embassy_time::Instant;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Car operation modes
///
/// Informational for now: the ramp engine behaves the same in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum OperationMode {
    /// Car drives itself, joystick input only switches modes
    Auto,
    /// Car follows joystick commands
    Manual,
}

impl OperationMode {
    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            OperationMode::Auto => "auto",
            OperationMode::Manual => "manual",
        }
    }
}

/// Runtime state of the drive controller
///
/// Initialized to:
/// - Manual operation mode
/// - All timestamps at the boot instant
/// - Standby gate released (driver powered down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct ControllerState {
    /// Current operation mode
    pub mode: OperationMode,
    /// Instant of the last valid command
    pub last_command: Instant,
    /// Instant of the last non-zero target
    pub last_activity: Instant,
    /// Instant of the last completed ramp tick
    pub last_ramp: Instant,
    /// First instant both axes were observed at rest, if they still are
    pub rest_since: Option<Instant>,
    /// Standby gate status
    /// - true: driver powered, outputs take effect
    /// - false: driver in standby
    pub standby_enabled: bool,
    /// Command timeout currently in force
    pub timed_out: bool,
}

impl ControllerState {
    /// Fresh state at boot
    pub fn new(now: Instant) -> Self {
        Self {
            mode: OperationMode::Manual,
            last_command: now,
            last_activity: now,
            last_ramp: now,
            rest_since: Some(now),
            standby_enabled: false,
            timed_out: false,
        }
    }

    /// Updates operation mode
    ///
    /// Returns true if the mode actually changed.
    pub fn set_operation_mode(&mut self, new_mode: OperationMode) -> bool {
        if self.mode == new_mode {
            return false;
        }
        self.mode = new_mode;
        true
    }

    /// Records a valid command
    pub fn touch_command(&mut self, now: Instant) {
        self.last_command = now;
    }

    /// Records motion demand and requests the standby gate
    pub fn touch_activity(&mut self, now: Instant) {
        self.last_activity = now;
        self.rest_since = None;
        self.standby_enabled = true;
    }
}
