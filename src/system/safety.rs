//! Safety Supervisor
//!
//! Two independent timeout checks, evaluated at the top of every ramp tick:
//! 1. **Command timeout**: no valid command within the window stops both
//!    motors hard and releases the standby gate.
//! 2. **Idle standby**: both axes resting for longer than the idle window
//!    releases the standby gate to save power.
//!
//! The checks only decide; applying the stop to the hardware is left to the
//! drive controller.

use embassy_time::{Duration, Instant};

use crate::system::state::ControllerState;

/// Checks whether the control link has been silent for too long
///
/// Latches `timed_out` in the state so the transition in either direction is
/// logged exactly once. Returns true while the timeout is in force.
pub fn command_timed_out(state: &mut ControllerState, now: Instant, timeout: Duration) -> bool {
    let silence = now.saturating_duration_since(state.last_command);
    let timed_out = silence > timeout;

    if timed_out && !state.timed_out {
        warn!("no command for {} ms, forcing stop", silence.as_millis());
    } else if !timed_out && state.timed_out {
        info!("command link restored");
    }

    state.timed_out = timed_out;
    timed_out
}

/// Decides whether the standby gate should be released after an idle period
///
/// `at_rest` is true when both axes have target and current at zero. The
/// idle period counts from the later of the last activity and the moment
/// the axes came to rest (see [`note_rest`]). Returns true exactly on the
/// tick that releases the gate; the gate is never re-asserted here.
pub fn idle_standby_due(
    state: &mut ControllerState,
    at_rest: bool,
    now: Instant,
    idle_timeout: Duration,
) -> bool {
    if !at_rest {
        state.rest_since = None;
        return false;
    }

    let rest_since = *state.rest_since.get_or_insert(now);
    let idle_from = rest_since.max(state.last_activity);

    if state.standby_enabled && now.saturating_duration_since(idle_from) > idle_timeout {
        state.standby_enabled = false;
        return true;
    }
    false
}

/// Records the moment both axes came to rest
///
/// Called after the ramp step, so the tick that brings the last axis to zero
/// starts the idle window. Motion clears the mark.
pub fn note_rest(state: &mut ControllerState, at_rest: bool, now: Instant) {
    if at_rest {
        state.rest_since.get_or_insert(now);
    } else {
        state.rest_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMAND_TIMEOUT: Duration = Duration::from_millis(300);
    const IDLE_TIMEOUT: Duration = Duration::from_millis(1500);

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    #[test]
    fn command_timeout_fires_only_after_the_window() {
        let mut state = ControllerState::new(ms(0));
        assert!(!command_timed_out(&mut state, ms(300), COMMAND_TIMEOUT));
        assert!(command_timed_out(&mut state, ms(301), COMMAND_TIMEOUT));
        assert!(state.timed_out);
    }

    #[test]
    fn fresh_command_clears_the_timeout() {
        let mut state = ControllerState::new(ms(0));
        assert!(command_timed_out(&mut state, ms(400), COMMAND_TIMEOUT));
        state.touch_command(ms(410));
        assert!(!command_timed_out(&mut state, ms(420), COMMAND_TIMEOUT));
        assert!(!state.timed_out);
    }

    #[test]
    fn clock_behind_last_command_is_not_a_timeout() {
        let mut state = ControllerState::new(ms(1000));
        assert!(!command_timed_out(&mut state, ms(10), COMMAND_TIMEOUT));
    }

    #[test]
    fn motion_keeps_the_gate_asserted() {
        let mut state = ControllerState::new(ms(0));
        state.touch_activity(ms(0));
        assert!(!idle_standby_due(&mut state, false, ms(5000), IDLE_TIMEOUT));
        assert!(state.standby_enabled);
        assert_eq!(state.rest_since, None);
    }

    #[test]
    fn gate_released_after_idle_window_from_rest() {
        let mut state = ControllerState::new(ms(0));
        state.touch_activity(ms(0));

        // Still ramping down until t=600.
        assert!(!idle_standby_due(&mut state, false, ms(570), IDLE_TIMEOUT));
        assert!(!idle_standby_due(&mut state, true, ms(600), IDLE_TIMEOUT));
        assert!(!idle_standby_due(&mut state, true, ms(2100), IDLE_TIMEOUT));
        assert!(state.standby_enabled);
        assert!(idle_standby_due(&mut state, true, ms(2101), IDLE_TIMEOUT));
        assert!(!state.standby_enabled);
        // Already released, nothing more to do.
        assert!(!idle_standby_due(&mut state, true, ms(9000), IDLE_TIMEOUT));
    }

    #[test]
    fn new_activity_restarts_the_idle_window() {
        let mut state = ControllerState::new(ms(0));
        state.touch_activity(ms(0));
        assert!(!idle_standby_due(&mut state, true, ms(30), IDLE_TIMEOUT));
        state.touch_activity(ms(1000));
        assert!(!idle_standby_due(&mut state, true, ms(1030), IDLE_TIMEOUT));
        assert!(!idle_standby_due(&mut state, true, ms(2530), IDLE_TIMEOUT));
        assert!(idle_standby_due(&mut state, true, ms(2531), IDLE_TIMEOUT));
    }

    #[test]
    fn rest_mark_is_kept_until_motion() {
        let mut state = ControllerState::new(ms(0));
        state.touch_activity(ms(0));
        note_rest(&mut state, false, ms(30));
        assert_eq!(state.rest_since, None);
        note_rest(&mut state, true, ms(60));
        note_rest(&mut state, true, ms(90));
        assert_eq!(state.rest_since, Some(ms(60)));

        // Idle window runs from the tick that reached rest.
        assert!(!idle_standby_due(&mut state, true, ms(1560), IDLE_TIMEOUT));
        assert!(idle_standby_due(&mut state, true, ms(1561), IDLE_TIMEOUT));

        note_rest(&mut state, false, ms(1600));
        assert_eq!(state.rest_since, None);
    }
}
