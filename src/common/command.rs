//! ACOM command definitions.
//!
//! Two forms exist on the wire:
//!
//! - read: `ACOM /<sensor_id>\n`
//! - write: `ACOM /<sensor_id> <value>\n`

use alloc::string::{String, ToString};
use core::fmt;

/// Keyword that starts every command line.
pub const COMMAND_PREFIX: &str = "ACOM /";

/// An outgoing command for one exchange.
///
/// Identifier and value are written as given. Nothing is escaped or checked,
/// so callers must pass protocol-safe strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    sensor_id: &'a str,
    value: Option<&'a str>,
}

impl<'a> Command<'a> {
    pub const fn new(sensor_id: &'a str, value: Option<&'a str>) -> Self {
        Command { sensor_id, value }
    }

    /// Read the current value of `sensor_id`.
    pub const fn read(sensor_id: &'a str) -> Self {
        Self::new(sensor_id, None)
    }

    /// Write `value` to `sensor_id`.
    pub const fn write(sensor_id: &'a str, value: &'a str) -> Self {
        Self::new(sensor_id, Some(value))
    }

    #[inline]
    pub const fn sensor_id(&self) -> &'a str {
        self.sensor_id
    }

    #[inline]
    pub const fn value(&self) -> Option<&'a str> {
        self.value
    }

    #[inline]
    pub const fn is_write(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the full command line, trailing newline included.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(COMMAND_PREFIX)?;
        f.write_str(self.sensor_id)?;
        if let Some(value) = self.value {
            write!(f, " {}", value)?;
        }
        f.write_str("\n")
    }
}
