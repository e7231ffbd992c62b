//! Demonstration commands and the clap front end that dispatches to them.

use std::{io::Write, time::Duration};

use argot_core::{Compiler, ConversionPolicy, FromToken, command};
use clap::{Args, Parser, Subcommand};
use tracing::{info, instrument};

use super::runtime::{CliError, Command, CommandError, Outcome, execute};

/// Top-level CLI options parsed by [`clap`].
///
/// Everything after the subcommand name is handed to the argot binder
/// untouched.
#[derive(Debug, Parser, Clone)]
#[command(name = "argot", about = "Run argot demonstration commands.")]
pub struct Cli {
    /// Drop unconvertible values from multi-value fields instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: DemoCommand,
}

/// Supported demonstration commands.
#[derive(Debug, Subcommand, Clone)]
pub enum DemoCommand {
    /// Greet one person, or nobody in particular.
    #[command(disable_help_flag = true)]
    Greeting(RawArgs),
    /// Greet several people.
    #[command(disable_help_flag = true)]
    Greetings(RawArgs),
    /// Confirm a playback mode.
    #[command(disable_help_flag = true)]
    Run(RawArgs),
    /// Add up durations.
    #[command(disable_help_flag = true)]
    Timer(RawArgs),
}

impl DemoCommand {
    /// Returns the raw arguments destined for the binder.
    #[must_use]
    pub fn args(&self) -> &[String] {
        match self {
            Self::Greeting(raw) | Self::Greetings(raw) | Self::Run(raw) | Self::Timer(raw) => {
                &raw.args
            }
        }
    }

    /// Returns the usage text of the selected command.
    #[must_use]
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            Self::Greeting(_) => Greeting::USAGE,
            Self::Greetings(_) => Greetings::USAGE,
            Self::Run(_) => Run::USAGE,
            Self::Timer(_) => Timer::USAGE,
        }
    }
}

/// Arguments passed through to the argot binder.
#[derive(Debug, Args, Clone, Default)]
pub struct RawArgs {
    /// Arguments bound onto the command's fields.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

/// Executes the demo command selected by `cli`, writing its output to `out`.
///
/// # Errors
/// Returns [`CliError`] when binding or execution fails.
///
/// # Examples
/// ```
/// use argot_cli::cli::{Cli, DemoCommand, RawArgs, run_cli};
///
/// let cli = Cli {
///     lenient: false,
///     command: DemoCommand::Greeting(RawArgs { args: vec!["Ada".into()] }),
/// };
/// let mut out: Vec<u8> = Vec::new();
/// run_cli(&cli, &mut out)?;
/// assert_eq!(out, b"Hello, Ada!\n");
/// # Ok::<(), argot_cli::cli::CliError>(())
/// ```
pub fn run_cli(cli: &Cli, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let policy = if cli.lenient {
        ConversionPolicy::Lenient
    } else {
        ConversionPolicy::FailFast
    };
    let compiler = Compiler::builder().with_conversion_policy(policy).build();
    let args = cli.command.args().to_vec();
    match &cli.command {
        DemoCommand::Greeting(_) => execute::<Greeting>(&compiler, args, out),
        DemoCommand::Greetings(_) => execute::<Greetings>(&compiler, args, out),
        DemoCommand::Run(_) => execute::<Run>(&compiler, args, out),
        DemoCommand::Timer(_) => execute::<Timer>(&compiler, args, out),
    }
}

command! {
    /// Greets one person, or the world at large.
    #[derive(Debug, PartialEq)]
    pub struct Greeting {
        pub input person: Option<String>,
    }
}

impl Command for Greeting {
    fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        match &self.person {
            Some(person) => writeln!(out, "Hello, {person}!")?,
            None => writeln!(out, "Hello!")?,
        }
        Ok(())
    }
}

command! {
    /// Greets every named person.
    #[derive(Debug, PartialEq)]
    pub struct Greetings {
        /// Quote each greeting. Only the full `-debug` marker turns it on.
        pub flag(strict) debug: bool,
        /// Say "Hey" instead of "Hello".
        pub flag informal: bool,
        pub multi_input people: Vec<String>,
    }
}

impl Greetings {
    fn prefix(&self) -> &'static str {
        if self.informal { "Hey" } else { "Hello" }
    }

    fn emit(&self, out: &mut dyn Write, line: &str) -> Result<(), CommandError> {
        if self.debug {
            writeln!(out, "{line:?}")?;
        } else {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl Command for Greetings {
    const USAGE: Option<&'static str> = Some("usage: greetings [-debug] [-informal] [people...]");

    fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        let prefix = self.prefix();
        if self.people.is_empty() {
            return self.emit(out, &format!("{prefix}!"));
        }
        for person in &self.people {
            self.emit(out, &format!("{prefix}, {person}!"))?;
        }
        Ok(())
    }
}

/// Playback mode accepted by [`Run`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunMode {
    /// Begin playback.
    #[default]
    Start,
    /// Suspend playback.
    Pause,
    /// End playback.
    Stop,
}

impl FromToken for RunMode {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Self::Start),
            "pause" => Some(Self::Pause),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }

    fn expected() -> std::borrow::Cow<'static, str> {
        "RunMode (start, pause or stop)".into()
    }
}

command! {
    /// Confirms a playback mode.
    #[derive(Debug, PartialEq)]
    pub struct Run {
        pub input mode: RunMode,
    }
}

impl Command for Run {
    const USAGE: Option<&'static str> = Some("usage: run [start|pause|stop]");

    fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        let message = match self.mode {
            RunMode::Start => "started",
            RunMode::Pause => "paused",
            RunMode::Stop => "stopped …",
        };
        writeln!(out, "{message}")?;
        Ok(())
    }
}

/// A duration written as a number followed by a unit, such as `1m`, `0.5h`
/// or `1e3ms`.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use argot_cli::cli::TimerDuration;
/// use argot_core::FromToken;
///
/// let parsed = TimerDuration::from_token("1e3ms").map(TimerDuration::get);
/// assert_eq!(parsed, Some(Duration::from_secs(1)));
/// assert_eq!(TimerDuration::from_token("5 parsecs"), None);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimerDuration(Duration);

impl TimerDuration {
    /// Unit suffixes with their length in seconds as `multiplier / divisor`,
    /// in match order. Multi-letter suffixes precede their last letter.
    const UNITS: [(&'static str, f64, f64); 8] = [
        ("ms", 1.0, 1e3),
        ("µs", 1.0, 1e6),
        ("us", 1.0, 1e6),
        ("ns", 1.0, 1e9),
        ("h", 3600.0, 1.0),
        ("m", 60.0, 1.0),
        ("s", 1.0, 1.0),
        ("", 1.0, 1.0),
    ];

    /// Returns the parsed duration.
    #[must_use]
    pub fn get(self) -> Duration {
        self.0
    }
}

impl FromToken for TimerDuration {
    fn from_token(token: &str) -> Option<Self> {
        Self::UNITS.iter().find_map(|(suffix, multiplier, divisor)| {
            let number: f64 = token.strip_suffix(suffix)?.parse().ok()?;
            Duration::try_from_secs_f64(number * multiplier / divisor)
                .ok()
                .map(Self)
        })
    }

    fn expected() -> std::borrow::Cow<'static, str> {
        "duration (30s, 1m, 0.5h, ...)".into()
    }
}

command! {
    /// Adds up durations and prints the total.
    #[derive(Debug, PartialEq)]
    pub struct Timer {
        pub multi_input durations: Vec<TimerDuration>,
    }
}

impl Timer {
    /// Returns the sum of every duration, or `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Duration> {
        self.durations
            .iter()
            .try_fold(Duration::ZERO, |sum, duration| sum.checked_add(duration.get()))
    }
}

impl Command for Timer {
    const USAGE: Option<&'static str> = Some(
        "usage: timer 0.5h 1m 1e3ms 1e5us 1e9ns\n\n\
         requirements:\n\
         - numbers must be exponent notation, floating point, or whole\n\
         - units hour, minute, second, millisecond, microsecond or nanosecond\n\
         - sum of all measurements must be at least one second",
    );

    #[instrument(name = "cli.timer", skip_all, fields(durations = self.durations.len()))]
    fn main(&mut self, out: &mut dyn Write) -> Result<(), CommandError> {
        if self.durations.is_empty() {
            return Err(CommandError::usage("input <duration> required"));
        }
        let total = self
            .total()
            .ok_or_else(|| CommandError::new("total duration is too large"))?;
        if total < Duration::from_secs(1) {
            return Err(CommandError::new("duration must be >= 1 seconds"));
        }
        info!(seconds = total.as_secs_f64(), "timer total computed");
        writeln!(out, "{}", format_clock(total))?;
        Ok(())
    }
}

/// Formats `duration` as `HH:MM:SS`, rounding partial seconds up.
pub(super) fn format_clock(duration: Duration) -> String {
    let seconds = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    format!("{hours:02}:{:02}:{:02}", rest / 60, rest % 60)
}
