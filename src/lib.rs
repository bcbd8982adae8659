// src/lib.rs

#![no_std] // std only comes in through the `std` feature

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod common;
pub mod exchange;
#[cfg(feature = "std")]
pub mod port;

// Re-export key types for convenience
pub use common::{ByteChannel, Clock, Command, ExchangeConfig, ExchangeError, ResponseBuffer};
pub use exchange::{Framer, Session};
