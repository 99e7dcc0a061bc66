//! Bounded retry with a fixed delay between attempts.
//!
//! Used for work that depends on entities which may not exist yet, e.g.
//! finding the player right after a scene was built. A system owns the
//! schedule, ticks it every frame and reports each failed attempt.

use std::time::Duration;

use bevy::prelude::*;

/// How often and how long to retry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Result of reporting a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Another attempt will be made after the delay.
    Retrying { attempt: u32, max_attempts: u32 },
    /// No attempts left.
    Exhausted { attempts: u32 },
}

/// Progress through a [`RetryPolicy`].
///
/// The first attempt is due immediately; later attempts are due once the
/// delay has elapsed since the previous failure.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    policy: RetryPolicy,
    attempts: u32,
    cooldown: Timer,
    waiting: bool,
}

impl RetrySchedule {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            cooldown: Timer::new(policy.delay, TimerMode::Once),
            waiting: false,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Number of failed attempts so far.
    pub fn failed_attempts(&self) -> u32 {
        self.attempts
    }

    /// Advance the delay; returns true when an attempt is due.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.is_exhausted() {
            return false;
        }
        if !self.waiting {
            return true;
        }
        self.cooldown.tick(delta);
        if self.cooldown.finished() {
            self.waiting = false;
            return true;
        }
        false
    }

    /// Record a failed attempt and start waiting for the next one.
    pub fn fail(&mut self) -> RetryOutcome {
        self.attempts += 1;
        if self.is_exhausted() {
            return RetryOutcome::Exhausted {
                attempts: self.attempts,
            };
        }
        self.cooldown.reset();
        self.waiting = true;
        RetryOutcome::Retrying {
            attempt: self.attempts,
            max_attempts: self.policy.max_attempts,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }
}
