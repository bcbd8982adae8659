//! Sends one ACOM command to a sensor and prints its reply to stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use acom::port::{SerialPort, SystemClock};
use acom::{Command, ExchangeConfig, ExchangeError, Session};
use anyhow::Context;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "acom-read", about = "Debug sensor reader")]
struct Args {
    /// Sensor identifier
    #[arg(short = 'i', long = "sensor", value_name = "SENSOR")]
    sensor_id: String,

    /// Serial device
    #[arg(short = 'd', long, value_name = "DEVICE")]
    device: PathBuf,

    /// Wanted timeout in ms
    #[arg(short = 't', long, value_name = "TIMEOUT", default_value_t = 100)]
    timeout: u64,

    /// Write value to sensor
    #[arg(short = 's', long = "set", value_name = "VALUE")]
    value: Option<String>,
}

/// Failure classes, each with its own exit status.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Failure {
    Usage = 1,
    Device = 2,
    Send = 3,
    Receive = 4,
}

impl From<Failure> for ExitCode {
    fn from(failure: Failure) -> Self {
        ExitCode::from(failure as u8)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err((failure, e)) => {
            let _ = e.print();
            return failure.into();
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err((failure, e)) => {
            eprintln!("ERROR: {:#}", e);
            failure.into()
        }
    }
}

/// Parses the command line. Printing help counts as a usage exit, like a bad option.
fn parse_args<I, T>(argv: I) -> Result<Args, (Failure, clap::Error)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|e| (Failure::Usage, e))
}

fn run(args: &Args) -> Result<(), (Failure, anyhow::Error)> {
    let port = SerialPort::open(&args.device)
        .with_context(|| format!("failed to open the serial device '{}'", args.device.display()))
        .map_err(|e| (Failure::Device, e))?;

    let config = ExchangeConfig::new().with_timeout_ms(args.timeout);
    let mut session = Session::new(port, SystemClock).with_config(config);
    let command = Command::new(&args.sensor_id, args.value.as_deref());

    let response = session.execute(&command).map_err(|e| classify(&command, e))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(response.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write the sensor response")
        .map_err(|e| (Failure::Receive, e))
}

fn classify(command: &Command<'_>, e: ExchangeError<std::io::Error>) -> (Failure, anyhow::Error) {
    if e.is_send_failure() {
        let what = match command.value() {
            Some(value) => format!("write command for value '{}'", value),
            None => "read command".to_string(),
        };
        (Failure::Send, anyhow::Error::new(e).context(format!("failed to send {}", what)))
    } else {
        (Failure::Receive, anyhow::Error::new(e).context("failed to receive sensor response"))
    }
}
