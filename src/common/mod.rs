// src/common/mod.rs

pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;

// From command.rs
pub use command::{Command, COMMAND_PREFIX};

// From error.rs
pub use error::ExchangeError;

// From frame.rs
pub use frame::{FailureKind, FrameState, ResponseBuffer, RESPONSE_CAPACITY};

// From hal_traits.rs
pub use hal_traits::{AcomInstant, ByteChannel, Clock};

// From timing.rs (constants stay under common::timing::*)
pub use timing::{Deadline, ExchangeConfig};
