// src/exchange/mod.rs

pub mod framer;

#[cfg(test)]
pub(crate) mod mock;

pub use framer::Framer;

use crate::common::{
    command::Command,
    error::ExchangeError,
    frame::ResponseBuffer,
    hal_traits::{ByteChannel, Clock},
    timing::{Deadline, ExchangeConfig},
};

/// Drives command/response exchanges over one channel.
///
/// Every exchange is independent: a fresh [`Framer`] and deadline are built per
/// call and nothing is retried.
#[derive(Debug)]
pub struct Session<CH, CK> {
    channel: CH,
    clock: CK,
    config: ExchangeConfig,
}

impl<CH, CK> Session<CH, CK>
where
    CH: ByteChannel,
    CK: Clock,
{
    pub fn new(channel: CH, clock: CK) -> Self {
        Session {
            channel,
            clock,
            config: ExchangeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn into_inner(self) -> (CH, CK) {
        (self.channel, self.clock)
    }

    // --- Public Blocking Methods ---

    /// Reads the current value of `sensor_id`.
    pub fn read(&mut self, sensor_id: &str) -> Result<ResponseBuffer, ExchangeError<CH::Error>> {
        self.execute(&Command::read(sensor_id))
    }

    /// Writes `value` to `sensor_id` and returns the device's reply.
    pub fn write(
        &mut self,
        sensor_id: &str,
        value: &str,
    ) -> Result<ResponseBuffer, ExchangeError<CH::Error>> {
        self.execute(&Command::write(sensor_id, value))
    }

    /// Sends `command` and waits for one framed response.
    ///
    /// The deadline starts once the command has been written.
    pub fn execute(
        &mut self,
        command: &Command<'_>,
    ) -> Result<ResponseBuffer, ExchangeError<CH::Error>> {
        self.send_command(command)?;

        let start = self.clock.now();
        let deadline = Deadline::after(start, self.config.timeout);
        let mut framer = Framer::with_quantum(self.config.poll_quantum);

        if let Err(e) = nb::block!(framer.advance(&mut self.channel, &self.clock, deadline)) {
            log::debug!(
                "exchange with sensor {} failed after {:?}: {}",
                command.sensor_id(),
                self.clock.now() - start,
                e
            );
            return Err(e);
        }

        let state = framer.state();
        let response = framer.into_response().ok_or(ExchangeError::Closed(state))?;
        log::debug!(
            "sensor {} replied with {} bytes in {:?}",
            command.sensor_id(),
            response.len(),
            self.clock.now() - start
        );
        Ok(response)
    }

    fn send_command(&mut self, command: &Command<'_>) -> Result<(), ExchangeError<CH::Error>> {
        let encoded = command.encode();
        log::debug!("sending {:?}", encoded);
        self.channel
            .write_all(encoded.as_bytes())
            .map_err(ExchangeError::CommandSendFailed)
    }
}
