//! Drive Tuning
//!
//! Runtime configuration for the ramp engine and the safety supervisor.
//! Defaults match the stock car: 8-bit PWM capped at 200, one ramp tick
//! every 30 ms, a 300 ms command timeout and 1.5 s idle standby.

use embassy_time::Duration;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Default duty clamp for both axes
pub const DEFAULT_MAX_DUTY: i16 = 200;

/// Default hardware duty resolution (8-bit PWM)
pub const DEFAULT_PWM_FULL_SCALE: u16 = 255;

/// Default spacing between ramp ticks
pub const DEFAULT_RAMP_INTERVAL: Duration = Duration::from_millis(30);

/// Default silence tolerated before the forced stop
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(300);

/// Default rest time before the driver is put into standby
pub const DEFAULT_STANDBY_IDLE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Number of ramp ticks a full-scale transition (0 to max duty) should take
pub const FULL_SCALE_RAMP_TICKS: i16 = 34;

/// Rejected configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum ConfigError {
    #[error("max duty must be positive")]
    NonPositiveMaxDuty,
    #[error("max duty exceeds the PWM full scale")]
    MaxDutyAboveFullScale,
    #[error("ramp step must be within 1..=max duty")]
    RampStepOutOfRange,
    #[error("ramp interval must be non-zero")]
    ZeroRampInterval,
    #[error("command timeout must be non-zero")]
    ZeroCommandTimeout,
    #[error("standby idle timeout is shorter than the command timeout")]
    IdleTimeoutBelowCommandTimeout,
}

/// Tunable parameters of the drive controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct RampConfig {
    /// Duty clamp applied to targets and hardware writes
    pub max_duty: i16,
    /// Largest duty the PWM hardware accepts
    pub pwm_full_scale: u16,
    /// Minimum spacing between two ramp ticks
    pub ramp_interval: Duration,
    /// Duty change per ramp tick
    pub ramp_step: i16,
    /// Silence after which both motors are stopped hard
    pub command_timeout: Duration,
    /// Rest time after which the standby gate is released
    pub standby_idle_timeout: Duration,
    /// Attach a target/current narrative to every status report
    pub debug_status: bool,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DUTY)
    }
}

impl RampConfig {
    /// Creates a configuration for the given duty clamp
    ///
    /// The ramp step is derived so a full-scale transition takes
    /// [`FULL_SCALE_RAMP_TICKS`] ticks; everything else uses the defaults.
    pub fn new(max_duty: i16) -> Self {
        Self {
            max_duty,
            pwm_full_scale: DEFAULT_PWM_FULL_SCALE,
            ramp_interval: DEFAULT_RAMP_INTERVAL,
            ramp_step: derive_ramp_step(max_duty),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            standby_idle_timeout: DEFAULT_STANDBY_IDLE_TIMEOUT,
            debug_status: false,
        }
    }

    pub fn with_pwm_full_scale(mut self, full_scale: u16) -> Self {
        self.pwm_full_scale = full_scale;
        self
    }

    pub fn with_ramp_interval(mut self, interval: Duration) -> Self {
        self.ramp_interval = interval;
        self
    }

    pub fn with_ramp_step(mut self, step: i16) -> Self {
        self.ramp_step = step;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_standby_idle_timeout(mut self, timeout: Duration) -> Self {
        self.standby_idle_timeout = timeout;
        self
    }

    pub fn with_debug_status(mut self, enabled: bool) -> Self {
        self.debug_status = enabled;
        self
    }

    /// Checks the configuration for consistency
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_duty <= 0 {
            return Err(ConfigError::NonPositiveMaxDuty);
        }
        if self.max_duty.unsigned_abs() > self.pwm_full_scale {
            return Err(ConfigError::MaxDutyAboveFullScale);
        }
        if self.ramp_step <= 0 || self.ramp_step > self.max_duty {
            return Err(ConfigError::RampStepOutOfRange);
        }
        if self.ramp_interval.as_ticks() == 0 {
            return Err(ConfigError::ZeroRampInterval);
        }
        if self.command_timeout.as_ticks() == 0 {
            return Err(ConfigError::ZeroCommandTimeout);
        }
        if self.standby_idle_timeout < self.command_timeout {
            return Err(ConfigError::IdleTimeoutBelowCommandTimeout);
        }
        Ok(self)
    }
}

/// Ramp step for a full-scale transition in [`FULL_SCALE_RAMP_TICKS`] ticks
///
/// Rounds up so the transition never takes longer than the tick budget, and
/// never returns less than 1.
fn derive_ramp_step(max_duty: i16) -> i16 {
    if max_duty <= 0 {
        return 1;
    }
    let ticks = i32::from(FULL_SCALE_RAMP_TICKS);
    let step = (i32::from(max_duty) + ticks - 1) / ticks;
    step.max(1) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_is_six_for_max_duty_200() {
        let config = RampConfig::default();
        assert_eq!(config.max_duty, 200);
        assert_eq!(config.ramp_step, 6);
        assert_eq!(config.ramp_interval, Duration::from_millis(30));
        assert_eq!(config.command_timeout, Duration::from_millis(300));
        assert_eq!(config.standby_idle_timeout, Duration::from_millis(1500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn small_max_duty_still_gets_a_positive_step() {
        assert_eq!(RampConfig::new(10).ramp_step, 1);
        assert_eq!(RampConfig::new(255).ramp_step, 8);
    }

    #[test]
    fn rejects_inconsistent_settings() {
        assert_eq!(
            RampConfig::new(0).validate(),
            Err(ConfigError::NonPositiveMaxDuty)
        );
        assert_eq!(
            RampConfig::new(300).validate(),
            Err(ConfigError::MaxDutyAboveFullScale)
        );
        assert_eq!(
            RampConfig::default().with_ramp_step(0).validate(),
            Err(ConfigError::RampStepOutOfRange)
        );
        assert_eq!(
            RampConfig::default().with_ramp_step(201).validate(),
            Err(ConfigError::RampStepOutOfRange)
        );
        assert_eq!(
            RampConfig::default()
                .with_ramp_interval(Duration::from_ticks(0))
                .validate(),
            Err(ConfigError::ZeroRampInterval)
        );
        assert_eq!(
            RampConfig::default()
                .with_command_timeout(Duration::from_ticks(0))
                .validate(),
            Err(ConfigError::ZeroCommandTimeout)
        );
        assert_eq!(
            RampConfig::default()
                .with_standby_idle_timeout(Duration::from_millis(100))
                .validate(),
            Err(ConfigError::IdleTimeoutBelowCommandTimeout)
        );
    }

    #[test]
    fn wider_pwm_allows_larger_duty() {
        let config = RampConfig::new(1000).with_pwm_full_scale(1023).validate();
        assert!(config.is_ok());
    }
}
