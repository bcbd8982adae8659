// src/exchange/framer.rs

use crate::common::{
    error::ExchangeError,
    frame::{FailureKind, FrameState, ResponseBuffer, CR, LF},
    hal_traits::{ByteChannel, Clock},
    timing::{self, Deadline},
};
use core::time::Duration;

/// Response framing state machine for a single exchange.
///
/// Line endings are ambiguous on the wire, so two rules apply:
/// a CR ends the frame immediately, while an LF only ends it on the second
/// sighting. Content bytes between the two LFs are kept and do not reset
/// the first sighting. Neither terminator is stored.
#[derive(Debug, Clone)]
pub struct Framer {
    state: FrameState,
    buffer: ResponseBuffer,
    quantum: Duration,
}

impl Framer {
    pub fn new() -> Self {
        Self::with_quantum(timing::POLL_QUANTUM)
    }

    pub fn with_quantum(quantum: Duration) -> Self {
        Framer {
            state: FrameState::Reading,
            buffer: ResponseBuffer::new(),
            quantum,
        }
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn buffer(&self) -> &ResponseBuffer {
        &self.buffer
    }

    /// Classifies one received byte and returns the resulting state.
    ///
    /// Bytes offered after the frame reached a terminal state are ignored.
    pub fn feed(&mut self, byte: u8) -> FrameState {
        if self.state.is_terminal() {
            return self.state;
        }

        match byte {
            LF => {
                self.state = match self.state {
                    FrameState::SawFirstLf => FrameState::Done,
                    _ => FrameState::SawFirstLf,
                };
            }
            CR => self.state = FrameState::Done,
            _ => {
                if !self.buffer.push(byte) && self.buffer.dropped() == 1 {
                    log::warn!("response exceeds {} bytes, discarding the rest", self.buffer.len());
                }
            }
        }

        self.state
    }

    /// Runs one poll-or-read step.
    ///
    /// Returns `Ok(())` once the frame is complete and `WouldBlock` while it is
    /// still open. Failures are terminal; a framer that already finished does
    /// not touch the channel or the clock again.
    pub fn advance<CH, CK>(
        &mut self,
        channel: &mut CH,
        clock: &CK,
        deadline: Deadline<CK::Instant>,
    ) -> nb::Result<(), ExchangeError<CH::Error>>
    where
        CH: ByteChannel,
        CK: Clock,
    {
        match self.state {
            FrameState::Done => return Ok(()),
            state if state.is_terminal() => {
                return Err(nb::Error::Other(ExchangeError::Closed(state)))
            }
            _ => {}
        }

        match channel.poll_readable(self.quantum) {
            Ok(()) => match channel.read_byte() {
                Ok(Some(byte)) => {
                    log::trace!("received {:#04x}", byte);
                    match self.feed(byte) {
                        FrameState::Done => Ok(()),
                        _ => Err(nb::Error::WouldBlock),
                    }
                }
                Ok(None) => {
                    self.state = FrameState::Failed(FailureKind::UnexpectedEof);
                    Err(nb::Error::Other(ExchangeError::UnexpectedEof))
                }
                Err(e) => {
                    self.state = FrameState::Failed(FailureKind::ReadFailed);
                    Err(nb::Error::Other(ExchangeError::ReadFailed(e)))
                }
            },
            Err(nb::Error::WouldBlock) => {
                if deadline.has_passed(clock.now()) {
                    self.state = FrameState::TimedOut;
                    Err(nb::Error::Other(ExchangeError::TimedOut))
                } else {
                    Err(nb::Error::WouldBlock)
                }
            }
            Err(nb::Error::Other(e)) => {
                self.state = FrameState::Failed(FailureKind::PollFailed);
                Err(nb::Error::Other(ExchangeError::PollFailed(e)))
            }
        }
    }

    /// Hands out the payload if the frame completed, `None` otherwise.
    pub fn into_response(self) -> Option<ResponseBuffer> {
        match self.state {
            FrameState::Done => Some(self.buffer),
            _ => None,
        }
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}
