//! Drive Commands
//!
//! Decoded joystick commands and the decoder that produces them from framed
//! transport messages.
//!
//! # Wire format
//! One command per frame:
//! - `A` / `M`: switch to auto / manual mode
//! - `S`: emergency stop
//! - `{"steer": <int>, "throttle": <int>}`: joystick position, missing
//!   fields default to 0
//!
//! Malformed frames are rejected with a [`DecodeError`] and must be dropped
//! by the caller without touching the controller.

use heapless::Vec;
use serde::Deserialize;

use crate::system::state::OperationMode;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Decoded command consumed by the drive controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Command {
    /// Select the operation mode
    Mode(OperationMode),
    /// Joystick position, each value nominally within -255..=255
    Drive { steer: i32, throttle: i32 },
    /// Stop both motors at once and release the standby gate
    EmergencyStop,
}

impl Command {
    /// Joystick released
    pub const STOP: Command = Command::Drive {
        steer: 0,
        throttle: 0,
    };
}

/// Reasons a frame could not be turned into a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum DecodeError {
    #[error("empty command")]
    Empty,
    #[error("unknown mode selector {0:#04x}")]
    UnknownMode(u8),
    #[error("malformed drive payload")]
    Malformed,
}

/// JSON drive payload
#[derive(Debug, Deserialize)]
struct DrivePayload {
    #[serde(default)]
    steer: i32,
    #[serde(default)]
    throttle: i32,
}

/// Decodes one framed message
///
/// Leading and trailing ASCII whitespace is ignored.
pub fn decode(message: &[u8]) -> Result<Command, DecodeError> {
    match message.trim_ascii() {
        [] => Err(DecodeError::Empty),
        [b'A'] => Ok(Command::Mode(OperationMode::Auto)),
        [b'M'] => Ok(Command::Mode(OperationMode::Manual)),
        [b'S'] => Ok(Command::EmergencyStop),
        [other] => Err(DecodeError::UnknownMode(*other)),
        payload @ [b'{', ..] => {
            let (drive, _) = serde_json_core::from_slice::<DrivePayload>(payload)
                .map_err(|_| DecodeError::Malformed)?;
            Ok(Command::Drive {
                steer: drive.steer,
                throttle: drive.throttle,
            })
        }
        _ => Err(DecodeError::Malformed),
    }
}

/// Frame assembly failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum FrameError {
    #[error("frame exceeded the line buffer")]
    Overflow,
}

/// Splits a byte stream into newline-terminated frames
///
/// A trailing `\r` is stripped from each frame. A frame longer than `N`
/// bytes is discarded up to the next newline and reported once as
/// [`FrameError::Overflow`].
pub struct LineFramer<const N: usize> {
    buf: Vec<u8, N>,
    overflowed: bool,
    complete: bool,
}

impl<const N: usize> Default for LineFramer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineFramer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
            complete: false,
        }
    }

    /// Feeds one byte, returning a frame once its newline arrives
    pub fn push(&mut self, byte: u8) -> Option<Result<&[u8], FrameError>> {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        if byte == b'\n' {
            if self.overflowed {
                self.overflowed = false;
                self.buf.clear();
                return Some(Err(FrameError::Overflow));
            }
            self.complete = true;
            let frame = self.buf.as_slice();
            return Some(Ok(frame.strip_suffix(b"\r").unwrap_or(frame)));
        }

        if !self.overflowed && self.buf.push(byte).is_err() {
            self.overflowed = true;
            self.buf.clear();
        }
        None
    }
}
