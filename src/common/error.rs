// src/common/error.rs

use super::frame::FrameState;

/// Terminal outcome of a failed exchange.
///
/// `E` is the error type of the underlying [`ByteChannel`](super::ByteChannel).
/// None of these are retried; each one ends the exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError<E = ()>
where
    E: core::fmt::Debug, // Debug is enough for the Io-style variants below
{
    /// Writing the command failed or was cut short.
    #[error("failed to send command: {0:?}")]
    CommandSendFailed(E),

    /// Waiting for readability failed.
    #[error("failed to poll for sensor response: {0:?}")]
    PollFailed(E),

    /// Reading a response byte failed at the transport level.
    #[error("failed to read sensor response: {0:?}")]
    ReadFailed(E),

    /// The stream ended before the response was terminated.
    #[error("end of stream reached before response was terminated")]
    UnexpectedEof,

    /// No terminated response arrived before the deadline.
    #[error("timed out while waiting for sensor response")]
    TimedOut,

    /// The framer was advanced after it had already failed.
    #[error("exchange already finished in state {0:?}")]
    Closed(FrameState),
}

impl<E: core::fmt::Debug> ExchangeError<E> {
    /// True when the command never made it onto the line.
    ///
    /// Everything else is a failure on the receiving side.
    pub fn is_send_failure(&self) -> bool {
        matches!(self, ExchangeError::CommandSendFailed(_))
    }
}
