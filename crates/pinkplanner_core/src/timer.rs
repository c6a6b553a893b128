//! Pomodoro countdown.
//!
//! Independent of the state tree. The host calls `tick` once per second;
//! nothing here owns a thread or an interval.

use log::debug;

pub const DEFAULT_POMODORO_SECONDS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroTimer {
    state: TimerState,
    remaining: u32,
    start_seconds: u32,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(DEFAULT_POMODORO_SECONDS)
    }
}

impl PomodoroTimer {
    pub fn new(start_seconds: u32) -> Self {
        Self {
            state: TimerState::Idle,
            remaining: start_seconds,
            start_seconds,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Idle or paused becomes running; already running is a no-op.
    ///
    /// Starting an idle timer that already counted down to zero has nothing
    /// to count, so it stays idle.
    pub fn start(&mut self) {
        if self.state == TimerState::Running || self.remaining == 0 {
            return;
        }
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Back to idle with the configured starting value.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = self.start_seconds;
    }

    /// One second elapsed. Returns `true` when this tick finished the countdown.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Idle;
            debug!("event=pomodoro_finished module=timer status=ok");
            return true;
        }
        false
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
