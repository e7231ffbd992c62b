//! Unit tests for the command runtime and the demonstration commands.

use super::commands::format_clock;
use super::{
    Cli, CliError, Command, CommandError, DemoCommand, EXIT_FAILURE, EXIT_SOFTWARE, EXIT_USAGE,
    Greetings, Outcome, RawArgs, Run, RunMode, Timer, TimerDuration, execute, render_failure,
    run_cli,
};

use std::io::Write;
use std::time::Duration;

use argot_core::{
    Bindable, BindingError, Compiler, FieldDescriptor, FieldSlots, FromToken, Schema, Slot,
};
use argot_test_support::tracing::RecordingLayer;
use clap::Parser;
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn compiler() -> Compiler {
    Compiler::new()
}

fn demo(command: fn(RawArgs) -> DemoCommand, args: &[&str]) -> Cli {
    Cli {
        lenient: false,
        command: command(RawArgs {
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        }),
    }
}

fn run_to_string(cli: &Cli) -> Result<String, CliError> {
    let mut out: Vec<u8> = Vec::new();
    run_cli(cli, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn run_expecting_error(cli: &Cli) -> CliError {
    match run_cli(cli, &mut Vec::<u8>::new()) {
        Ok(outcome) => panic!("expected failure, got {outcome:?}"),
        Err(err) => err,
    }
}

#[rstest]
#[case::nobody(&[], "Hello!\n")]
#[case::one(&["Ada"], "Hello, Ada!\n")]
#[case::last_wins(&["Ada", "Grace"], "Hello, Grace!\n")]
#[case::help_is_a_name(&["help"], "Hello, help!\n")]
fn greeting_greets_the_last_argument(#[case] args: &[&str], #[case] expected: &str) {
    let output = run_to_string(&demo(DemoCommand::Greeting, args)).expect("greeting must run");
    assert_eq!(output, expected);
}

#[rstest]
#[case::plain_by_default(&["Ada"], "Hello, Ada!\n")]
#[case::quoted(&["-debug", "Ada", "Grace"], "\"Hello, Ada!\"\n\"Hello, Grace!\"\n")]
#[case::informal(&["Ada", "-i", "-debug"], "\"Hey, Ada!\"\n")]
#[case::nobody(&["--informal"], "Hey!\n")]
fn greetings_follow_their_flags(#[case] args: &[&str], #[case] expected: &str) {
    let output = run_to_string(&demo(DemoCommand::Greetings, args)).expect("greetings must run");
    assert_eq!(output, expected);
}

#[rstest]
fn strict_debug_flag_ignores_short_form() {
    let output = run_to_string(&demo(DemoCommand::Greetings, &["-d"])).expect("must run");
    assert_eq!(output, "Hello, -d!\n");
    assert!(!Greetings::default().debug);
}

#[rstest]
#[case::help("help")]
#[case::single_dash("-help")]
#[case::double_dash("--help")]
fn help_token_prints_usage(compiler: Compiler, #[case] token: &str) {
    let mut out: Vec<u8> = Vec::new();
    let outcome = execute::<Greetings>(&compiler, [token, "Ada"], &mut out).expect("usage");
    assert_eq!(outcome, Outcome::Usage);
    assert_eq!(
        String::from_utf8_lossy(&out),
        format!("{}\n", Greetings::USAGE.expect("greetings has usage"))
    );
}

#[rstest]
#[case(&[], "started\n")]
#[case(&["start"], "started\n")]
#[case(&["pause"], "paused\n")]
#[case(&["stop"], "stopped …\n")]
fn run_confirms_the_mode(#[case] args: &[&str], #[case] expected: &str) {
    let output = run_to_string(&demo(DemoCommand::Run, args)).expect("run must succeed");
    assert_eq!(output, expected);
}

#[rstest]
fn run_rejects_unknown_mode() {
    let err = run_expecting_error(&demo(DemoCommand::Run, &["rewind"]));
    assert_eq!(err.exit_code(), EXIT_USAGE);
    assert_eq!(err.code(), Some("ARGOT_CONVERSION_FAILURE"));
    assert_eq!(
        err.to_string(),
        "mode: couldn't convert 'rewind' to a value of type RunMode (start, pause or stop)"
    );
}

#[rstest]
fn run_mode_parses_known_tokens() {
    assert_eq!(RunMode::from_token("pause"), Some(RunMode::Pause));
    assert_eq!(RunMode::from_token("Pause"), None);
    assert_eq!(Run::default().mode, RunMode::Start);
}

#[rstest]
#[case::hours("2h", 7_200_000)]
#[case::half_hour("0.5h", 1_800_000)]
#[case::minutes("1m", 60_000)]
#[case::seconds("30s", 30_000)]
#[case::bare_seconds("4", 4_000)]
#[case::millis("1e3ms", 1_000)]
#[case::micros("2e6us", 2_000)]
#[case::micro_sign("1.5e6µs", 1_500)]
#[case::nanos("1e9ns", 1_000)]
fn timer_duration_parses_units(#[case] token: &str, #[case] millis: u64) {
    let parsed = TimerDuration::from_token(token).map(TimerDuration::get);
    assert_eq!(parsed, Some(Duration::from_millis(millis)));
}

#[rstest]
#[case("")]
#[case("m")]
#[case("-1s")]
#[case("infs")]
#[case("1 week")]
fn timer_duration_rejects_malformed_tokens(#[case] token: &str) {
    assert_eq!(TimerDuration::from_token(token), None);
}

#[rstest]
#[case(&["1m", "30s"], "00:01:30\n")]
#[case(&["0.5h", "1h"], "01:30:00\n")]
#[case(&["1.5s"], "00:00:02\n")]
fn timer_prints_the_total(#[case] args: &[&str], #[case] expected: &str) {
    let output = run_to_string(&demo(DemoCommand::Timer, args)).expect("timer must run");
    assert_eq!(output, expected);
}

#[rstest]
fn timer_rejects_short_totals() {
    let err = run_expecting_error(&demo(DemoCommand::Timer, &["500ms", "0.2s"]));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(err.code(), None);
    match err {
        CliError::Command(command) => {
            assert_eq!(command.reason(), "duration must be >= 1 seconds");
            assert!(!command.shows_usage());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn timer_without_durations_shows_usage() {
    let err = run_expecting_error(&demo(DemoCommand::Timer, &[]));
    assert_eq!(err.exit_code(), EXIT_USAGE);
    assert_eq!(err.code(), None);

    let mut report: Vec<u8> = Vec::new();
    render_failure(&err, Timer::USAGE, &mut report).expect("render to memory");
    let usage = Timer::USAGE.expect("timer has usage");
    assert_eq!(
        String::from_utf8_lossy(&report),
        format!("input <duration> required\n\n{usage}\n")
    );
}

#[rstest]
fn timer_lenient_mode_drops_bad_durations() {
    let mut cli = demo(DemoCommand::Timer, &["1m", "soon", "5s"]);
    let err = run_expecting_error(&cli);
    assert_eq!(err.exit_code(), EXIT_USAGE);

    cli.lenient = true;
    let output = run_to_string(&cli).expect("lenient timer must run");
    assert_eq!(output, "00:01:05\n");
}

#[rstest]
fn timer_total_reports_overflow() {
    let timer = Timer {
        durations: vec![
            TimerDuration::from_token("1e19s").expect("valid duration"),
            TimerDuration::from_token("1e19s").expect("valid duration"),
        ],
    };
    assert_eq!(timer.total(), None);
}

#[rstest]
#[case(Duration::ZERO, "00:00:00")]
#[case(Duration::from_millis(1), "00:00:01")]
#[case(Duration::from_secs(3_661), "01:01:01")]
#[case(Duration::from_secs(100 * 3_600), "100:00:00")]
fn format_clock_pads_components(#[case] duration: Duration, #[case] expected: &str) {
    assert_eq!(format_clock(duration), expected);
}

#[derive(Default)]
struct Ghost;

impl FieldSlots for Ghost {
    fn slot(&mut self, _field: &str) -> Option<Slot<'_>> {
        None
    }
}

impl Bindable for Ghost {
    fn schema() -> &'static Schema {
        const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::flag("hidden")];
        static SCHEMA: Schema = Schema::from_static(FIELDS);
        &SCHEMA
    }
}

impl Command for Ghost {
    const USAGE: Option<&'static str> = Some("usage: ghost");

    fn main(&mut self, _out: &mut dyn Write) -> Result<(), CommandError> {
        Ok(())
    }
}

#[rstest]
fn declaration_defects_exit_with_software_status(compiler: Compiler) {
    let err = execute::<Ghost>(&compiler, ["-h"], &mut Vec::<u8>::new())
        .expect_err("ghost has no storage slot");
    assert!(matches!(
        err,
        CliError::Binding(BindingError::UnknownField { field: "hidden" })
    ));
    assert_eq!(err.exit_code(), EXIT_SOFTWARE);

    let mut report: Vec<u8> = Vec::new();
    render_failure(&err, Ghost::USAGE, &mut report).expect("render to memory");
    assert_eq!(
        String::from_utf8_lossy(&report),
        "field `hidden` is declared in the schema but has no storage slot\n"
    );
}

#[rstest]
fn user_errors_are_followed_by_usage() {
    let err = run_expecting_error(&demo(DemoCommand::Run, &["fast"]));
    let mut report: Vec<u8> = Vec::new();
    render_failure(&err, Run::USAGE, &mut report).expect("render to memory");
    let report = String::from_utf8_lossy(&report);
    assert!(report.ends_with("\n\nusage: run [start|pause|stop]\n"));
}

#[rstest]
fn command_errors_are_reported_without_usage() {
    let err = CliError::from(CommandError::new("duration must be >= 1 seconds"));
    let mut report: Vec<u8> = Vec::new();
    render_failure(&err, Timer::USAGE, &mut report).expect("render to memory");
    assert_eq!(report, b"duration must be >= 1 seconds\n");
}

#[rstest]
#[case::flags(&["argot", "greetings", "-debug", "Ada"], &["-debug", "Ada"], false)]
#[case::help(&["argot", "--lenient", "timer", "--help"], &["--help"], true)]
#[case::empty(&["argot", "run"], &[], false)]
fn clap_passes_arguments_through(
    #[case] argv: &[&str],
    #[case] expected: &[&str],
    #[case] lenient: bool,
) {
    let cli = Cli::try_parse_from(argv).expect("command line must parse");
    assert_eq!(cli.command.args(), expected);
    assert_eq!(cli.lenient, lenient);
}

#[rstest]
fn usage_follows_the_selected_command() {
    assert_eq!(demo(DemoCommand::Greeting, &[]).command.usage(), None);
    assert_eq!(demo(DemoCommand::Run, &[]).command.usage(), Run::USAGE);
}

#[rstest]
fn execution_is_traced(compiler: Compiler) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        execute::<Run>(&compiler, ["--verbose", "pause"], &mut Vec::<u8>::new())
    })
    .expect("run must succeed");

    let span = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(span.field("command"), Some("Run"));
    assert_eq!(span.field("tokens"), Some("2"));
    assert_eq!(span.field("ignored"), Some("1"));
    assert!(layer.span("core.bind").is_some());
    assert_eq!(layer.events_with_message("arguments left unbound").len(), 1);
}
