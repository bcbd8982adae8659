// src/port.rs

//! OS serial device as a [`ByteChannel`].

use crate::common::{
    hal_traits::{ByteChannel, Clock},
    timing,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::{Duration, Instant};

/// [`Clock`] backed by `std::time::Instant`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A serial device opened for reading and writing in non-blocking mode.
///
/// Reads go straight to the descriptor, one byte at a time, so readiness
/// reported by `poll` always matches what `read` will see.
#[derive(Debug)]
pub struct SerialPort {
    file: File,
}

impl SerialPort {
    /// Opens `path` read/write and switches it to non-blocking mode.
    ///
    /// The device does not become the controlling terminal.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)?;
        Self::from_file(file)
    }

    /// Wraps an already open descriptor, such as one end of a socket pair.
    pub fn from_fd(fd: OwnedFd) -> io::Result<Self> {
        Self::from_file(File::from(fd))
    }

    fn from_file(file: File) -> io::Result<Self> {
        set_nonblocking(file.as_raw_fd())?;
        Ok(SerialPort { file })
    }

    /// Waits up to `max_wait` for any of `events` on the descriptor.
    ///
    /// Returns `Ok(false)` when the wait elapsed without readiness.
    fn wait(&self, events: libc::c_short, max_wait: Duration) -> io::Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events,
            revents: 0,
        };

        let ready = unsafe { libc::poll(&mut pollfd, 1, poll_timeout_ms(max_wait)) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            // A signal only shortens the wait; the caller checks its deadline.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(false);
        }

        // A hang-up still counts as readable: the next read reports end of file.
        if pollfd.revents & (events | libc::POLLHUP) != 0 {
            return Ok(true);
        }
        if pollfd.revents & (libc::POLLERR | libc::POLLNVAL) != 0 {
            return Err(io::Error::other(std::format!(
                "device poll error (revents=0x{:x})",
                pollfd.revents
            )));
        }
        Ok(false)
    }
}

impl ByteChannel for SerialPort {
    type Error = io::Error;

    fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            match self.file.write(bytes) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => bytes = &bytes[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if !self.wait(libc::POLLOUT, timing::WRITE_STALL_MAX)? {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "device stopped accepting the command",
                        ));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        self.file.flush()
    }

    fn poll_readable(&mut self, max_wait: Duration) -> nb::Result<(), io::Error> {
        match self.wait(libc::POLLIN, max_wait) {
            Ok(true) => Ok(()),
            Ok(false) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.file.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// `poll` takes whole milliseconds; round up so short waits never become busy spins.
fn poll_timeout_ms(max_wait: Duration) -> libc::c_int {
    let ms = max_wait.as_micros().div_ceil(1000);
    ms.min(libc::c_int::MAX as u128) as libc::c_int
}
