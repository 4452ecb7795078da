//! Command and status channels
//!
//! Glue between the serial link and the drive task:
//! - commands travel through a bounded queue that the drive task drains on
//!   every pass, so mode changes are never lost and the newest joystick
//!   position wins
//! - status reports are broadcast; a listener that falls behind loses the
//!   oldest reports instead of stalling the drive task

use defmt::warn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pubsub::{ImmediatePublisher, PubSubChannel};
use joystick_car::system::command::Command;
use joystick_car::system::status::StatusReport;

/// Maximum number of commands waiting for the drive task
const COMMAND_QUEUE_SIZE: usize = 8;

/// Status reports kept for slow listeners
const STATUS_DEPTH: usize = 4;

/// Status listeners (serial link only for now)
const STATUS_SUBSCRIBERS: usize = 2;

/// Decoded commands on their way to the drive task
static COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_SIZE> = Channel::new();

/// Status broadcast fed by the drive task
pub static STATUS: PubSubChannel<
    CriticalSectionRawMutex,
    StatusReport,
    STATUS_DEPTH,
    STATUS_SUBSCRIBERS,
    1,
> = PubSubChannel::new();

/// Publisher handed to the drive controller
pub type StatusPublisher = ImmediatePublisher<
    'static,
    CriticalSectionRawMutex,
    StatusReport,
    STATUS_DEPTH,
    STATUS_SUBSCRIBERS,
    1,
>;

/// Queues a decoded command without waiting
///
/// A full queue drops the command; the drive task's command timeout covers
/// a producer that keeps outrunning it.
pub fn submit(command: Command) {
    if COMMANDS.try_send(command).is_err() {
        warn!("command queue full, dropping {}", command);
    }
}

/// Next queued command, if any
pub fn try_next_command() -> Option<Command> {
    COMMANDS.try_receive().ok()
}

/// Publisher for the status broadcast
pub fn status_publisher() -> StatusPublisher {
    STATUS.immediate_publisher()
}
