//! Execution of bound commands and mapping of failures to exit statuses.

use std::io::{self, Write};

use argot_core::{Bindable, BindingError, Compiler, TokenList, tokens::option_text};
use thiserror::Error;
use tracing::{Span, debug, field, instrument};

/// Exit status for argument binding errors caused by the user's input.
pub const EXIT_USAGE: u8 = 2;
/// Exit status for a command whose declaration is defective.
pub const EXIT_SOFTWARE: u8 = 70;
/// Exit status for a command that ran and reported a failure.
pub const EXIT_FAILURE: u8 = 1;

/// A runnable command whose fields are bound from arguments.
///
/// # Examples
/// ```
/// use std::io::Write;
///
/// use argot_cli::cli::{Command, CommandError, Outcome, execute};
/// use argot_core::{Compiler, command};
///
/// command! {
///     #[derive(Debug)]
///     struct Echo {
///         flag upper: bool,
///         multi_input words: Vec<String>,
///     }
/// }
///
/// impl Command for Echo {
///     fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
///         let line = self.words.join(" ");
///         let line = if self.upper { line.to_uppercase() } else { line };
///         writeln!(out, "{line}")?;
///         Ok(())
///     }
/// }
///
/// let mut out: Vec<u8> = Vec::new();
/// let outcome = execute::<Echo>(&Compiler::new(), ["-u", "hi", "there"], &mut out)?;
/// assert_eq!(outcome, Outcome::Completed);
/// assert_eq!(out, b"HI THERE\n");
/// # Ok::<(), argot_cli::cli::CliError>(())
/// ```
pub trait Command: Bindable + Default {
    /// Usage text shown on request and after argument errors.
    const USAGE: Option<&'static str> = None;

    /// Runs the command with its fields already bound.
    ///
    /// # Errors
    /// Returns [`CommandError`] when the command cannot complete.
    fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError>;
}

/// Failure reported by a command after binding succeeded.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{reason}")]
pub struct CommandError {
    reason: String,
    shows_usage: bool,
}

impl CommandError {
    /// Creates an error carrying a user-facing `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            shows_usage: false,
        }
    }

    /// Creates an error for input the command cannot work with. It exits
    /// like a binding error and is reported together with the usage text.
    #[must_use]
    pub fn usage(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            shows_usage: true,
        }
    }

    /// Returns the user-facing reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Whether the report should be followed by the usage text.
    #[must_use]
    pub const fn shows_usage(&self) -> bool {
        self.shows_usage
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        Self::new(format!("failed to write output: {err}"))
    }
}

/// Errors surfaced while executing a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments could not be bound onto the command.
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// The command ran and failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Usage text could not be written.
    #[error("failed to write usage: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl CliError {
    /// Returns the process exit status for this error.
    ///
    /// # Examples
    /// ```
    /// use argot_cli::cli::{CliError, CommandError};
    /// use argot_core::BindingError;
    ///
    /// assert_eq!(CliError::from(BindingError::MissingValue { field: "n" }).exit_code(), 2);
    /// assert_eq!(CliError::from(BindingError::UnknownField { field: "n" }).exit_code(), 70);
    /// assert_eq!(CliError::from(CommandError::new("nope")).exit_code(), 1);
    /// assert_eq!(CliError::from(CommandError::usage("input required")).exit_code(), 2);
    /// ```
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Binding(err) if err.is_declaration_defect() => EXIT_SOFTWARE,
            Self::Binding(_) => EXIT_USAGE,
            Self::Command(err) if err.shows_usage() => EXIT_USAGE,
            Self::Command(_) | Self::Io { .. } => EXIT_FAILURE,
        }
    }

    /// Whether the report for this error should be followed by usage text.
    #[must_use]
    pub fn shows_usage(&self) -> bool {
        match self {
            Self::Binding(err) => !err.is_declaration_defect(),
            Self::Command(err) => err.shows_usage(),
            Self::Io { .. } => false,
        }
    }

    /// Returns the stable binding error code, when the failure came from
    /// binding.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Binding(err) => Some(err.code().as_str()),
            _ => None,
        }
    }
}

/// How a command execution finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The command ran to completion.
    Completed,
    /// Usage text was printed instead of running the command.
    Usage,
}

/// Binds `tokens` onto a fresh `C` and runs it, writing its output to `out`.
///
/// When `C` declares [`Command::USAGE`] and the first token is `help`,
/// `-help` or `--help`, the usage text is written instead. Tokens left over
/// after binding are ignored.
///
/// # Errors
/// Returns [`CliError::Binding`] when binding fails and
/// [`CliError::Command`] when the command itself fails.
#[instrument(
    name = "cli.run",
    err,
    skip(compiler, tokens, out),
    fields(command = C::command_name(), tokens = field::Empty, ignored = field::Empty),
)]
pub fn execute<C: Command>(
    compiler: &Compiler,
    tokens: impl Into<TokenList>,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    let mut tokens = tokens.into();
    let span = Span::current();
    span.record("tokens", tokens.len());

    if let Some(usage) = C::USAGE
        && tokens.get(0).is_some_and(|first| option_text(first) == "help")
    {
        writeln!(out, "{usage}")?;
        return Ok(Outcome::Usage);
    }

    let mut command = C::default();
    compiler.bind_into(&mut command, &mut tokens)?;
    span.record("ignored", tokens.len());
    if !tokens.is_empty() {
        debug!(ignored = ?tokens.as_slice(), "arguments left unbound");
    }
    command.main(out)?;
    Ok(Outcome::Completed)
}

/// Writes the user-facing report for `err` to `writer`, followed by `usage`
/// when the arguments were at fault (see [`CliError::shows_usage`]).
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
///
/// # Examples
/// ```
/// use argot_cli::cli::{CliError, render_failure};
/// use argot_core::BindingError;
///
/// let err = CliError::from(BindingError::MissingValue { field: "name" });
/// let mut buffer: Vec<u8> = Vec::new();
/// render_failure(&err, Some("usage: demo -name <value>"), &mut buffer)?;
/// assert_eq!(
///     String::from_utf8_lossy(&buffer),
///     "name: missing value after option marker\n\nusage: demo -name <value>\n",
/// );
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_failure(
    err: &CliError,
    usage: Option<&str>,
    mut writer: impl Write,
) -> io::Result<()> {
    writeln!(writer, "{err}")?;
    if let Some(usage) = usage
        && err.shows_usage()
    {
        writeln!(writer, "\n{usage}")?;
    }
    Ok(())
}
