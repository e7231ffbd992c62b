//! Command runtime and demonstration commands for the argot CLI.
//!
//! [`execute`] binds arguments onto any [`Command`] and runs it, while
//! [`CliError::exit_code`] maps failures to exit statuses. [`run_cli`]
//! dispatches to the demonstration commands from a `clap` front end.

mod commands;
mod runtime;

pub use commands::{
    Cli, DemoCommand, Greeting, Greetings, RawArgs, Run, RunMode, Timer, TimerDuration, run_cli,
};
pub use runtime::{
    CliError, Command, CommandError, EXIT_FAILURE, EXIT_SOFTWARE, EXIT_USAGE, Outcome, execute,
    render_failure,
};

#[cfg(test)]
mod tests;
