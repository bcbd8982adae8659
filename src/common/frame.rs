// src/common/frame.rs

use arrayvec::ArrayVec;
use core::str::Utf8Error;

/// Maximum number of payload bytes kept from one response.
pub const RESPONSE_CAPACITY: usize = 1024;

/// Line feed. Two of them end a frame.
pub const LF: u8 = b'\n';
/// Carriage return. Ends a frame on sight.
pub const CR: u8 = b'\r';

/// Why an exchange failed at the transport level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    PollFailed,
    ReadFailed,
    UnexpectedEof,
}

/// Progress of the response framer during one exchange.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FrameState {
    /// Collecting payload, no LF seen yet.
    #[default]
    Reading,
    /// One LF was swallowed; the next LF completes the frame.
    SawFirstLf,
    /// Frame complete.
    Done,
    /// Deadline passed while no data was readable.
    TimedOut,
    /// Transport failure.
    Failed(FailureKind),
}

impl FrameState {
    /// True once no further byte may be consumed.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            FrameState::Done | FrameState::TimedOut | FrameState::Failed(_)
        )
    }
}

/// Bounded, append-only response payload.
///
/// Bytes past [`RESPONSE_CAPACITY`] are counted and discarded, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    bytes: ArrayVec<u8, RESPONSE_CAPACITY>,
    dropped: usize,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `byte`, returning `false` if it was dropped for lack of space.
    pub fn push(&mut self, byte: u8) -> bool {
        match self.bytes.try_push(byte) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The payload as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        core::str::from_utf8(&self.bytes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    /// Number of payload bytes discarded because the buffer was full.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_inner(self) -> ArrayVec<u8, RESPONSE_CAPACITY> {
        self.bytes
    }
}

impl AsRef<[u8]> for ResponseBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
