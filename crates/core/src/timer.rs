//! Informational countdown shown next to an active quiz.
//!
//! The countdown is driven by the shell (one `tick` per second). Reaching
//! zero only changes its phase; it never submits or locks anything.

use crate::time::format_mmss;

/// Default exam length.
pub const DEFAULT_TOTAL_SECS: u32 = 60 * 60;
/// Remaining time below which the countdown is in its warning phase.
pub const DEFAULT_WARN_SECS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Normal,
    Warning,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total_secs: u32,
    warn_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_SECS)
    }
}

impl Countdown {
    /// A running countdown of `total_secs` with the default warning window.
    #[must_use]
    pub fn new(total_secs: u32) -> Self {
        Self {
            total_secs,
            warn_secs: DEFAULT_WARN_SECS,
            remaining_secs: total_secs,
            running: total_secs > 0,
        }
    }

    #[must_use]
    pub fn with_warning(mut self, warn_secs: u32) -> Self {
        self.warn_secs = warn_secs;
        self
    }

    #[must_use]
    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by one second; stops itself on reaching zero.
    pub fn tick(&mut self) -> u32 {
        if self.running && self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        if self.remaining_secs == 0 {
            self.running = false;
        }
        self.remaining_secs
    }

    /// Apply `secs` ticks at once.
    pub fn elapse(&mut self, secs: u32) -> u32 {
        if self.running {
            self.remaining_secs = self.remaining_secs.saturating_sub(secs);
        }
        if self.remaining_secs == 0 {
            self.running = false;
        }
        self.remaining_secs
    }

    /// Pause or resume. An expired countdown stays stopped.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running && self.remaining_secs > 0;
        self.running
    }

    pub fn reset(&mut self, start_running: bool) {
        self.remaining_secs = self.total_secs;
        self.running = start_running && self.total_secs > 0;
    }

    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        if self.remaining_secs == 0 {
            TimerPhase::Expired
        } else if self.remaining_secs < self.warn_secs {
            TimerPhase::Warning
        } else {
            TimerPhase::Normal
        }
    }

    /// `MM:SS`, suffixed with `" !"` once expired.
    #[must_use]
    pub fn label(&self) -> String {
        let text = format_mmss(self.remaining_secs);
        match self.phase() {
            TimerPhase::Expired => format!("{text} !"),
            TimerPhase::Normal | TimerPhase::Warning => text,
        }
    }
}
