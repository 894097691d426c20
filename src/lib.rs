//! Library entry point for the articles crate.
//! This file re-exports key types for use in the binary and in tests.

pub mod app;
pub mod env;
pub mod fs;
pub mod log;
pub mod repository;
pub mod utils;

pub use utils::*;

/// Default buffer size used for actor channels.
/// This constant defines how many pending messages an actor mailbox can hold.
pub const BUFFER_SIZE: usize = 128;
