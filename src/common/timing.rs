// src/common/timing.rs

use super::hal_traits::AcomInstant;
use core::time::Duration;

/// Response timeout used when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Longest single wait for readability.
///
/// The deadline is checked after every idle poll, so a timeout can overshoot
/// by at most one quantum.
pub const POLL_QUANTUM: Duration = Duration::from_millis(1);

/// How long a blocked command write may stall before the send is abandoned.
pub const WRITE_STALL_MAX: Duration = Duration::from_millis(100);

/// Absolute point after which an idle exchange gives up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Deadline<I> {
    At(I),
    /// The timeout reaches past what the clock can represent.
    Never,
}

impl<I: AcomInstant> Deadline<I> {
    /// `start + timeout`, saturating to [`Deadline::Never`] on overflow.
    pub fn after(start: I, timeout: Duration) -> Self {
        match start.checked_add(timeout) {
            Some(at) => Deadline::At(at),
            None => Deadline::Never,
        }
    }

    pub fn has_passed(&self, now: I) -> bool {
        match self {
            Deadline::At(at) => now >= *at,
            Deadline::Never => false,
        }
    }
}

/// Exchange timing knobs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Time allowed between sending the command and a terminated response.
    pub timeout: Duration,
    /// Upper bound for each readability poll.
    pub poll_quantum: Duration,
}

impl ExchangeConfig {
    pub const fn new() -> Self {
        ExchangeConfig {
            timeout: DEFAULT_TIMEOUT,
            poll_quantum: POLL_QUANTUM,
        }
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_timeout_ms(self, ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(ms))
    }

    pub const fn with_poll_quantum(mut self, quantum: Duration) -> Self {
        self.poll_quantum = quantum;
        self
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self::new()
    }
}
