//! Cooperative one-second countdown.
//!
//! The countdown owns no thread or task; whoever drives the session calls
//! [`Countdown::tick`] once per second.

use std::fmt;

/// Result of a single [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The countdown is not running; nothing changed.
    Idle,
    /// One second elapsed; this many remain.
    Running(u32),
    /// The countdown reached zero on this tick. Reported once.
    Expired,
}

type ExpireHook = Box<dyn FnOnce() + Send>;

pub struct Countdown {
    remaining: u32,
    running: bool,
    expired: bool,
    on_expire: Option<ExpireHook>,
}

impl Countdown {
    /// A stopped countdown holding `duration_secs`.
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            running: false,
            expired: false,
            on_expire: None,
        }
    }

    /// Begin or resume counting. Has no effect once expired.
    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Pause counting. Safe to call repeatedly and from the expiry hook.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Register the hook fired when the countdown reaches zero.
    ///
    /// Replaces a hook that has not fired yet.
    pub fn on_expire(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.on_expire = Some(Box::new(hook));
    }

    /// Reset to `duration_secs`, stopped and not expired.
    ///
    /// A hook that already fired is not re-armed; register a new one.
    pub fn restart(&mut self, duration_secs: u32) {
        self.remaining = duration_secs;
        self.running = false;
        self.expired = false;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Tick::Running(self.remaining);
        }

        self.running = false;
        self.expired = true;
        if let Some(hook) = self.on_expire.take() {
            hook();
        }
        Tick::Expired
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("remaining", &self.remaining)
            .field("running", &self.running)
            .field("expired", &self.expired)
            .field("hook_armed", &self.on_expire.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn does_not_count_until_started() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn expires_exactly_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut countdown = Countdown::new(2);
        let counter = Arc::clone(&fired);
        countdown.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        countdown.start();

        assert_eq!(countdown.tick(), Tick::Running(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.tick(), Tick::Idle);

        countdown.start();
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(countdown.is_expired());
        assert!(!countdown.is_running());
    }

    #[test]
    fn stop_pauses_and_start_resumes() {
        let mut countdown = Countdown::new(10);
        countdown.start();
        countdown.tick();
        countdown.stop();
        countdown.stop();

        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 9);

        countdown.start();
        assert_eq!(countdown.tick(), Tick::Running(8));
    }

    #[test]
    fn restart_rearms_counting() {
        let mut countdown = Countdown::new(1);
        countdown.start();
        assert_eq!(countdown.tick(), Tick::Expired);

        countdown.restart(5);
        assert!(!countdown.is_expired());
        countdown.start();
        assert_eq!(countdown.tick(), Tick::Running(4));
    }
}
