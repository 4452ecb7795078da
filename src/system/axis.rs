//! Motor axis ramp state
//!
//! One [`MotorAxis`] per physical motor pair. Ingestion writes the target,
//! the ramp engine walks the current duty towards it one step per tick.

#[cfg(feature = "defmt")]
use defmt::Format;

/// Target and current duty of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct MotorAxis {
    target: i16,
    current: i16,
}

impl MotorAxis {
    /// Axis at rest
    pub const fn new() -> Self {
        Self {
            target: 0,
            current: 0,
        }
    }

    /// Desired steady-state duty
    pub fn target(&self) -> i16 {
        self.target
    }

    /// Duty commanded to the hardware on the last tick
    pub fn current(&self) -> i16 {
        self.current
    }

    /// Sets the target, clamped to `[-max_duty, max_duty]`
    ///
    /// Returns the clamped value.
    pub fn set_target(&mut self, value: i32, max_duty: i16) -> i16 {
        let max = i32::from(max_duty);
        self.target = value.clamp(-max, max) as i16;
        self.target
    }

    /// Advances the current duty by at most `step` towards the target
    ///
    /// Never overshoots: the last step is cut short at the target.
    pub fn advance(&mut self, step: i16) {
        if self.current < self.target {
            self.current = self.current.saturating_add(step).min(self.target);
        } else if self.current > self.target {
            self.current = self.current.saturating_sub(step).max(self.target);
        }
    }

    /// Drops target and current to zero at once
    pub fn halt(&mut self) {
        self.target = 0;
        self.current = 0;
    }

    /// Whether both target and current are zero
    pub fn is_at_rest(&self) -> bool {
        self.target == 0 && self.current == 0
    }
}
