#![forbid(unsafe_code)]

//! Headless driver for `flipstack-core`.
//!
//! Runs built-in gesture scenarios or recorded pointer traces through the
//! pan recognizer, the flip session and the spring animator, and prints the
//! resulting card states frame by frame.

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod sim;
pub mod trace;

pub use cli::run_from_env;
pub use error::{DemoError, Result};
