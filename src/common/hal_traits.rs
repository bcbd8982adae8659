// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::Sub;
use core::time::Duration;

/// Point in time produced by a [`Clock`].
pub trait AcomInstant: Copy + Ord + Sub<Self, Output = Duration> {
    /// Returns `self + duration`, or `None` if that is not representable.
    fn checked_add(self, duration: Duration) -> Option<Self>;
}

#[cfg(feature = "std")]
impl AcomInstant for std::time::Instant {
    fn checked_add(self, duration: Duration) -> Option<Self> {
        std::time::Instant::checked_add(&self, duration)
    }
}

/// Monotonic time source used for deadline checks.
pub trait Clock {
    type Instant: AcomInstant;

    /// Returns the current instant. Must never go backwards.
    fn now(&self) -> Self::Instant;
}

/// Abstraction over an open, non-blocking, bidirectional byte stream.
pub trait ByteChannel {
    /// Associated error type for transport errors.
    type Error: Debug;

    /// Writes the whole of `bytes`.
    ///
    /// A short write must be reported as an error.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Waits up to `max_wait` for at least one byte to become readable,
    /// without consuming it.
    ///
    /// Returns `Ok(())` once data is readable, or `Err(nb::Error::WouldBlock)`
    /// if nothing arrived within `max_wait`. Must never block longer than
    /// `max_wait`.
    fn poll_readable(&mut self, max_wait: Duration) -> nb::Result<(), Self::Error>;

    /// Reads exactly one byte after readability was signalled.
    ///
    /// `Ok(None)` means end of stream, which is not a transport error.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

impl<T: ByteChannel + ?Sized> ByteChannel for &mut T {
    type Error = T::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(bytes)
    }

    fn poll_readable(&mut self, max_wait: Duration) -> nb::Result<(), Self::Error> {
        (**self).poll_readable(max_wait)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }
}
