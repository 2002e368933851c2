/// Millisecond countdowns standing in for the independent periodic and
/// one-shot clocks of the game.  A `Timer` is advanced by the simulation step
/// and reports when it elapses; it never looks at wall-clock time.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Re-arms itself every time it fires.
    Repeating,
    /// Fires once, then stops.
    OneShot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    interval_ms: u32,
    remaining_ms: u32,
    active: bool,
    mode: TimerMode,
}

impl Timer {
    /// A stopped repeating timer.
    pub fn repeating(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            remaining_ms: interval_ms,
            active: false,
            mode: TimerMode::Repeating,
        }
    }

    /// A stopped one-shot timer.
    pub fn one_shot(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            remaining_ms: interval_ms,
            active: false,
            mode: TimerMode::OneShot,
        }
    }

    /// Builder-style helper for timers that run from construction.
    pub fn running(mut self) -> Self {
        self.start();
        self
    }

    /// Arm the timer for a full interval.  Starting an already-active
    /// one-shot timer is a no-op, so a countdown can't be pushed back by
    /// repeated triggers.
    pub fn start(&mut self) {
        if self.active && self.mode == TimerMode::OneShot {
            return;
        }
        self.active = true;
        self.remaining_ms = self.interval_ms;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.remaining_ms = self.interval_ms;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Advance by `dt_ms`; returns `true` if the timer elapsed during this
    /// step.  Fires at most once per call.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
        if self.remaining_ms > 0 {
            return false;
        }
        match self.mode {
            TimerMode::Repeating => self.remaining_ms = self.interval_ms,
            TimerMode::OneShot => self.stop(),
        }
        true
    }
}
