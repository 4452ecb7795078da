//! Joystick car drive core
//!
//! Turns decoded steering/throttle commands into ramped, clamped PWM drive
//! levels for two motor axes, stops the car when the control link goes quiet
//! and powers the motor driver down after a longer idle period.
//!
//! The core owns no hardware and no clock. Callers inject the current
//! [`embassy_time::Instant`] into every operation and provide a
//! [`system::motor::MotorDriver`] and a [`system::status::StatusSink`].

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

/// Drive control core
pub mod system;
