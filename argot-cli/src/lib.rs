//! Support library for the argot CLI binary.
//!
//! Exposes the command runtime and logging set-up so doctests and integration
//! tests can run commands without forking a subprocess.

pub mod cli;
pub mod logging;
