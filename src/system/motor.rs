//! Motor Drive Abstraction
//!
//! Narrow hardware seam between the drive core and whatever motor driver sits
//! on the board. The core only ever writes two things:
//! - a forward/reverse channel pair per axis
//! - the driver's standby/enable gate
//!
//! Translation from a signed duty into a channel pair lives here as well, so
//! every driver implementation sees the same sign convention.

#[cfg(feature = "defmt")]
use defmt::Format;

/// Motor axis selection
///
/// Axis A carries throttle (forward/back), axis B carries steering (left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Axis {
    /// Throttle axis
    A,
    /// Steering axis
    B,
}

impl Axis {
    /// Both axes in write order
    pub const ALL: [Axis; 2] = [Axis::A, Axis::B];

    /// Short name used in logs and status narratives
    pub fn name(self) -> &'static str {
        match self {
            Axis::A => "A",
            Axis::B => "B",
        }
    }
}

/// Duty levels for the two physical channels of one axis
///
/// At most one of the two channels is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct ChannelPair {
    /// Forward (or right) channel duty
    pub forward: u16,
    /// Reverse (or left) channel duty
    pub reverse: u16,
}

impl ChannelPair {
    /// Both channels off
    pub const OFF: ChannelPair = ChannelPair {
        forward: 0,
        reverse: 0,
    };

    /// Splits a signed duty into a channel pair
    ///
    /// The duty is clamped to `[-max_duty, max_duty]` first. Positive values
    /// drive the forward channel, negative values the reverse channel and
    /// zero leaves both channels at 0.
    pub fn from_duty(duty: i16, max_duty: i16) -> Self {
        let duty = duty.clamp(-max_duty, max_duty);
        if duty > 0 {
            ChannelPair {
                forward: duty.unsigned_abs(),
                reverse: 0,
            }
        } else if duty < 0 {
            ChannelPair {
                forward: 0,
                reverse: duty.unsigned_abs(),
            }
        } else {
            ChannelPair::OFF
        }
    }
}

/// Hardware interface consumed by the drive controller
///
/// Implementations may fail; the controller treats every write as best effort,
/// logs failures and carries on with the tick.
pub trait MotorDriver {
    /// Error reported by the underlying hardware
    type Error: core::fmt::Debug;

    /// Writes the channel pair of one axis
    fn write_channels(&mut self, axis: Axis, channels: ChannelPair) -> Result<(), Self::Error>;

    /// Asserts (`true`) or releases (`false`) the driver's standby/enable gate
    fn set_standby_gate(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

impl<T: MotorDriver + ?Sized> MotorDriver for &mut T {
    type Error = T::Error;

    fn write_channels(&mut self, axis: Axis, channels: ChannelPair) -> Result<(), Self::Error> {
        (**self).write_channels(axis, channels)
    }

    fn set_standby_gate(&mut self, enabled: bool) -> Result<(), Self::Error> {
        (**self).set_standby_gate(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_duty_drives_forward_channel() {
        assert_eq!(
            ChannelPair::from_duty(120, 200),
            ChannelPair {
                forward: 120,
                reverse: 0
            }
        );
    }

    #[test]
    fn negative_duty_drives_reverse_channel() {
        assert_eq!(
            ChannelPair::from_duty(-75, 200),
            ChannelPair {
                forward: 0,
                reverse: 75
            }
        );
    }

    #[test]
    fn zero_duty_turns_both_channels_off() {
        assert_eq!(ChannelPair::from_duty(0, 200), ChannelPair::OFF);
    }

    #[test]
    fn out_of_range_duty_is_clamped_before_translation() {
        assert_eq!(ChannelPair::from_duty(i16::MAX, 200).forward, 200);
        assert_eq!(ChannelPair::from_duty(i16::MIN, 200).reverse, 200);
    }
}
