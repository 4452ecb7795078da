//! Status Reporter
//!
//! Snapshot of the applied motor levels, published after every completed
//! ramp tick. Reports are fire-and-forget: a consumer that was not listening
//! misses them, nothing is buffered for replay.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pubsub::ImmediatePublisher;
use heapless::String;
use serde::Serialize;

use crate::system::axis::MotorAxis;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Capacity of the debug narrative
pub const DEBUG_CAPACITY: usize = 64;

/// Serialization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum StatusError {
    #[error("status buffer too small")]
    BufferFull,
}

/// Applied motor levels after one ramp tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Current duty of the throttle axis
    #[serde(rename = "motorA")]
    pub motor_a: i16,
    /// Current duty of the steering axis
    #[serde(rename = "motorB")]
    pub motor_b: i16,
    /// Target/current narrative, only when debug status is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String<DEBUG_CAPACITY>>,
}

impl StatusReport {
    /// Snapshot of both axes, optionally with the debug narrative
    pub fn capture(a: &MotorAxis, b: &MotorAxis, with_debug: bool) -> Self {
        let debug = with_debug.then(|| narrate(a, b));
        Self {
            motor_a: a.current(),
            motor_b: b.current(),
            debug,
        }
    }

    /// Writes the report as a JSON object into `buf`
    ///
    /// Returns the number of bytes written.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, StatusError> {
        serde_json_core::to_slice(self, buf).map_err(|_| StatusError::BufferFull)
    }
}

/// `A t=<target> c=<current> | B t=<target> c=<current>`
fn narrate(a: &MotorAxis, b: &MotorAxis) -> String<DEBUG_CAPACITY> {
    let mut text = String::new();
    // Worst case is well below the capacity, a failed write only truncates.
    let _ = write!(
        text,
        "A t={} c={} | B t={} c={}",
        a.target(),
        a.current(),
        b.target(),
        b.current()
    );
    text
}

/// Destination of status reports
pub trait StatusSink {
    /// Hands one report to every current consumer
    fn publish(&mut self, report: &StatusReport);
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn publish(&mut self, report: &StatusReport) {
        (**self).publish(report)
    }
}

/// Broadcast over an embassy pub/sub channel
///
/// Slow subscribers lose the oldest reports instead of stalling the tick.
impl<M: RawMutex, const CAP: usize, const SUBS: usize, const PUBS: usize> StatusSink
    for ImmediatePublisher<'_, M, StatusReport, CAP, SUBS, PUBS>
{
    fn publish(&mut self, report: &StatusReport) {
        self.publish_immediate(report.clone());
    }
}
