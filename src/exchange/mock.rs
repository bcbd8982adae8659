// src/exchange/mock.rs

//! Scripted in-memory channel and clock for exchange tests.

use crate::common::hal_traits::{AcomInstant, ByteChannel, Clock};
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::time::Duration;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl AcomInstant for MockInstant {
    fn checked_add(self, duration: Duration) -> Option<Self> {
        let us = u64::try_from(duration.as_micros()).ok()?;
        self.0.checked_add(us).map(MockInstant)
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MockCommError {
    Write,
    Poll,
    Read,
}

/// One step of what the far end does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Byte(u8),
    Eof,
    ReadError,
    PollError,
    /// Nothing arrives for this long.
    Silence(Duration),
}

// --- Mock Clock ---
#[derive(Debug, Clone)]
pub(crate) struct MockClock {
    now_us: Rc<Cell<u64>>,
}

impl MockClock {
    pub(crate) fn elapsed_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl Clock for MockClock {
    type Instant = MockInstant;
    fn now(&self) -> MockInstant {
        MockInstant(self.now_us.get())
    }
}

// --- Mock Channel ---
/// Idle polls advance the shared clock by their full `max_wait`.
#[derive(Debug)]
pub(crate) struct MockChannel {
    now_us: Rc<Cell<u64>>,
    script: VecDeque<Event>,
    pub written: Vec<u8>,
    pub fail_write: bool,
    pub poll_calls: usize,
    pub read_calls: usize,
}

impl MockChannel {
    pub(crate) fn new() -> (Self, MockClock) {
        let now_us = Rc::new(Cell::new(0));
        let channel = MockChannel {
            now_us: now_us.clone(),
            script: VecDeque::new(),
            written: Vec::new(),
            fail_write: false,
            poll_calls: 0,
            read_calls: 0,
        };
        (channel, MockClock { now_us })
    }

    pub(crate) fn stage_bytes(&mut self, data: &[u8]) {
        self.script.extend(data.iter().map(|b| Event::Byte(*b)));
    }

    pub(crate) fn stage(&mut self, event: Event) {
        self.script.push_back(event);
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.len()
    }

    fn advance_time(&mut self, by: Duration) {
        let now = self.now_us.get();
        self.now_us.set(now.saturating_add(by.as_micros() as u64));
    }
}

impl ByteChannel for MockChannel {
    type Error = MockCommError;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_write {
            return Err(MockCommError::Write);
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn poll_readable(&mut self, max_wait: Duration) -> nb::Result<(), Self::Error> {
        self.poll_calls += 1;
        match self.script.front_mut() {
            None => {
                self.advance_time(max_wait);
                Err(nb::Error::WouldBlock)
            }
            Some(Event::Silence(left)) => {
                let waited = (*left).min(max_wait);
                *left -= waited;
                if left.is_zero() {
                    self.script.pop_front();
                }
                self.advance_time(waited);
                Err(nb::Error::WouldBlock)
            }
            Some(Event::PollError) => {
                self.script.pop_front();
                Err(nb::Error::Other(MockCommError::Poll))
            }
            Some(_) => Ok(()),
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        self.read_calls += 1;
        match self.script.pop_front() {
            Some(Event::Byte(b)) => Ok(Some(b)),
            Some(Event::Eof) => Ok(None),
            _ => Err(MockCommError::Read),
        }
    }
}
