//! CLI entry point for the argot demonstration commands.
//!
//! Parses the outer command line with clap, hands the remaining arguments to
//! the selected argot command, and maps failures to exit statuses. Logging is
//! initialized eagerly so binding passes emit structured diagnostics via
//! `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use argot_cli::{
    cli::{Cli, CliError, run_cli, render_failure},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Run the selected command against stdout and flush the output stream.
fn try_main(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let outcome = run_cli(cli, &mut writer);
    writer.flush().context("failed to flush output")?;
    outcome?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let Err(err) = try_main(&cli) else {
        return ExitCode::SUCCESS;
    };

    let cli_error = err.downcast_ref::<CliError>();
    let code_field = cli_error
        .and_then(CliError::code)
        .map(field::display);
    error!(error = %err, code = code_field, "command execution failed");

    match cli_error {
        Some(cli_error) => {
            // The report is best-effort once stderr itself is failing.
            let _ = render_failure(cli_error, cli.command.usage(), io::stderr().lock());
            ExitCode::from(cli_error.exit_code())
        }
        None => ExitCode::FAILURE,
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
