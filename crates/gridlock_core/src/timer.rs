use std::time::Duration;

use derive_more::Display;

/// Solve timer as the container stores it: elapsed time plus whether the
/// clock is currently running
///
/// ```
/// use gridlock_core::{Timer, TimerState};
/// use std::time::Duration;
///
/// let mut timer = Timer::new(Duration::from_secs(42), TimerState::Running);
/// timer.toggle();
/// assert_eq!(timer.state(), TimerState::Stopped);
/// assert_eq!(timer.elapsed(), Duration::from_secs(42));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Timer {
    elapsed: Duration,
    state: TimerState,
}

impl Timer {
    pub fn new(elapsed: Duration, state: TimerState) -> Self {
        Self { elapsed, state }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Resume the timer if it is currently [stopped](TimerState::Stopped)
    pub fn start(&mut self) {
        self.state = TimerState::Running;
    }

    /// Stop the timer if it is currently [running](TimerState::Running)
    pub fn pause(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// Flip between the running and stopped [states](TimerState)
    pub fn toggle(&mut self) {
        match self.state {
            TimerState::Running => self.pause(),
            TimerState::Stopped => self.start(),
        }
    }
}

/// State variants that a [timer](Timer) can be in
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TimerState {
    /// The clock is counting
    #[display("0")]
    Running,

    /// The clock is stopped
    #[default]
    #[display("1")]
    Stopped,
}

impl From<TimerState> for u8 {
    fn from(state: TimerState) -> Self {
        match state {
            TimerState::Running => 0,
            TimerState::Stopped => 1,
        }
    }
}

impl TryFrom<u8> for TimerState {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(TimerState::Running),
            1 => Ok(TimerState::Stopped),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_the_state() {
        let mut timer = Timer::default();
        assert_eq!(timer.state(), TimerState::Stopped);

        timer.toggle();
        assert_eq!(timer.state(), TimerState::Running);

        timer.toggle();
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn state_bytes_round_trip() {
        for state in [TimerState::Running, TimerState::Stopped] {
            assert_eq!(TimerState::try_from(u8::from(state)), Ok(state));
        }

        assert_eq!(TimerState::try_from(2), Err(2));
    }
}
