// Library exports for linestep
// This allows the test suite to import modules

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod transport;

pub use error::{DebugError, DebugResult};
