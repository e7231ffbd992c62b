//! Tests for the binding pass orchestration.

mod common;

use argot_core::{
    Bindable, BindingError, BindingKind, Compiler, ConversionPolicy, FieldDescriptor, FieldSlots,
    Schema, Slot, TokenList, bind, bind_into,
};
use argot_test_support::tracing::RecordingLayer;
use common::{Archive, Mode, Player, Shared};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn compiler() -> Compiler {
    Compiler::new()
}

#[rstest]
fn defaults_survive_an_empty_pass() {
    let archive: Archive = bind(TokenList::default()).expect("empty input must bind");
    assert_eq!(archive, Archive::default());
    assert_eq!(archive.level, 6);
    assert!(!archive.verbose);
}

#[rstest]
fn every_kind_binds_in_one_pass(compiler: Compiler) {
    let archive: Archive = compiler
        .bind(["a.txt", "b.txt", "--level", "9", "-v", "--name", "backup", "-e", "*.o", "*.tmp"])
        .expect("arguments must bind");
    assert_eq!(
        archive,
        Archive {
            verbose: true,
            level: 9,
            name: Some("backup".into()),
            exclude: vec!["*.o".into(), "*.tmp".into()],
            paths: vec!["a.txt".into(), "b.txt".into()],
        }
    );
}

#[rstest]
fn multi_input_alone_takes_everything() {
    argot_core::command! {
        struct Files {
            multi_input files: Vec<String>,
        }
    }

    let mut files = Files::default();
    let mut tokens = TokenList::from(["a", "b", "c"]);
    bind_into(&mut files, &mut tokens).expect("strings always bind");
    assert_eq!(files.files, ["a", "b", "c"]);
    assert!(tokens.is_empty());
}

#[rstest]
fn flags_run_before_options_regardless_of_declaration_order() {
    let mut shared = Shared::default();
    let mut tokens = TokenList::from(["-c", "5"]);
    bind_into(&mut shared, &mut tokens).expect("binding must succeed");
    assert!(shared.compact);
    assert_eq!(shared.count, None);
    assert_eq!(tokens.as_slice(), ["5"]);
}

#[rstest]
fn input_sees_only_tokens_left_by_markers() {
    let player: Player = bind(["stop", "-loud"]).expect("binding must succeed");
    assert!(player.loud);
    assert_eq!(player.mode, Mode::Stop);
}

#[rstest]
fn strict_flag_leaves_short_form_for_the_input() {
    let err = bind::<Player>(["-l"]).expect_err("`-l` is not a mode");
    assert_eq!(
        err,
        BindingError::ConversionFailure {
            token: "-l".into(),
            field: "mode",
            expected: "Mode".into(),
        }
    );
}

#[rstest]
fn visibility_and_strict_modifier_declare_together() {
    let loud = Player::schema().field("loud").expect("loud is declared");
    assert_eq!(loud.kind(), BindingKind::Flag);
    assert!(loud.strict_name());

    let player: Player = bind(["-loud", "pause"]).expect("full name must bind");
    assert!(player.loud);
    assert_eq!(player.mode, Mode::Pause);
}

#[rstest]
fn multi_option_run_absorbs_trailing_values() {
    let archive: Archive = bind(["-e", "x", "y"]).expect("binding must succeed");
    assert_eq!(archive.exclude, ["x", "y"]);
    assert!(archive.paths.is_empty());
}

#[rstest]
fn first_error_stops_the_pass_without_rollback(compiler: Compiler) {
    let mut archive = Archive::default();
    let mut tokens = TokenList::from(["-v", "--level", "high", "-e", "a", "p"]);
    let err = compiler
        .bind_into(&mut archive, &mut tokens)
        .expect_err("level must be numeric");
    assert_eq!(
        err,
        BindingError::ConversionFailure {
            token: "high".into(),
            field: "level",
            expected: "u8".into(),
        }
    );
    assert!(archive.verbose, "flag bound before the failure stays bound");
    assert!(archive.exclude.is_empty(), "later binders never ran");
    assert_eq!(tokens.as_slice(), ["--level", "high", "-e", "a", "p"]);
}

#[rstest]
fn missing_option_value_is_reported() {
    let err = bind::<Archive>(["a", "--name"]).expect_err("name needs a value");
    assert_eq!(err, BindingError::MissingValue { field: "name" });
}

#[rstest]
fn unknown_markers_are_left_for_the_positional_field() {
    let mut archive = Archive::default();
    let mut tokens = TokenList::from(["--unknown", "a"]);
    bind_into(&mut archive, &mut tokens).expect("unknown markers are not errors");
    assert_eq!(archive.paths, ["--unknown", "a"]);
}

#[rstest]
fn lenient_policy_drops_bad_tokens() {
    argot_core::command! {
        #[derive(Debug)]
        struct Numbers {
            multi_option sizes: Vec<u32>,
            multi_input rest: Vec<u32>,
        }
    }

    let lenient = Compiler::builder()
        .with_conversion_policy(ConversionPolicy::Lenient)
        .build();
    let numbers: Numbers = lenient
        .bind(["1", "x", "2", "--sizes", "3", "big", "4"])
        .expect("lenient binding never fails on conversion");
    assert_eq!(numbers.sizes, [3, 4]);
    assert_eq!(numbers.rest, [1, 2]);

    let err = Compiler::new()
        .bind::<Numbers>(["1", "x"])
        .expect_err("fail-fast rejects `x`");
    assert!(matches!(err, BindingError::ConversionFailure { ref token, .. } if token == "x"));
}

#[rstest]
fn bracketed_token_fills_multi_input() {
    let archive: Archive = bind(["[a.txt, b.txt]"]).expect("bracketed list must bind");
    assert_eq!(archive.paths, ["a.txt", "b.txt"]);
}

#[rstest]
fn schema_reports_binding_order() {
    let names: Vec<&str> = Shared::schema()
        .binding_order()
        .into_iter()
        .map(FieldDescriptor::name)
        .collect();
    assert_eq!(names, ["compact", "count"]);
    assert_eq!(Archive::command_name(), "Archive");
}

struct Manual {
    quiet: bool,
    target: String,
}

impl FieldSlots for Manual {
    fn slot(&mut self, field: &str) -> Option<Slot<'_>> {
        match field {
            "quiet" => Some(Slot::Toggle(&mut self.quiet)),
            "target" => Some(Slot::Single(&mut self.target)),
            _ => None,
        }
    }
}

#[rstest]
fn runtime_schema_binds_manual_slots(compiler: Compiler) {
    let schema = Schema::builder()
        .flag("quiet")
        .input("target")
        .build()
        .expect("schema is valid");
    let mut manual = Manual {
        quiet: false,
        target: String::new(),
    };
    let mut tokens = TokenList::from(["-q", "host"]);
    compiler
        .bind_schema("manual", &schema, &mut manual, &mut tokens)
        .expect("manual slots must bind");
    assert!(manual.quiet);
    assert_eq!(manual.target, "host");
}

#[rstest]
#[case::unknown(
    FieldDescriptor::flag("missing"),
    BindingError::UnknownField { field: "missing" },
)]
#[case::mismatch(
    FieldDescriptor::multi_option("target"),
    BindingError::SlotMismatch { field: "target", kind: BindingKind::MultiOption },
)]
fn declaration_defects_surface_as_errors(
    compiler: Compiler,
    #[case] descriptor: FieldDescriptor,
    #[case] expected: BindingError,
) {
    let schema = Schema::try_new(vec![descriptor]).expect("schema is valid");
    let mut manual = Manual {
        quiet: false,
        target: String::new(),
    };
    let err = compiler
        .bind_schema("manual", &schema, &mut manual, &mut TokenList::default())
        .expect_err("declaration defect must fail");
    assert!(err.is_declaration_defect());
    assert_eq!(err, expected);
}

#[rstest]
fn binding_pass_is_traced(compiler: Compiler) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let archive: Archive = tracing::subscriber::with_default(subscriber, || {
        compiler.bind(["-v", "left", "over"])
    })
    .expect("binding must succeed");
    assert!(archive.verbose);

    let span = layer.span("core.bind").expect("core.bind span must exist");
    assert_eq!(span.field("command"), Some("Archive"));
    assert_eq!(span.field("tokens"), Some("3"));
    assert_eq!(span.field("policy"), Some("fail_fast"));
    assert_eq!(span.field("remaining"), Some("0"));

    let toggled = layer.events_with_message("flag toggled");
    assert_eq!(toggled.len(), 1);
    assert_eq!(toggled[0].level, Level::DEBUG);
    assert_eq!(toggled[0].field("field"), Some("verbose"));
}

#[rstest]
fn lenient_drops_are_logged_as_warnings() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let compiler = Compiler::builder()
        .with_conversion_policy(ConversionPolicy::Lenient)
        .build();

    tracing::subscriber::with_default(subscriber, || {
        let mut sizes: Vec<u8> = Vec::new();
        argot_core::binder::bind_multi_input(
            &FieldDescriptor::multi_input("sizes"),
            &mut sizes,
            &mut TokenList::from(["1", "huge"]),
            compiler.conversion_policy(),
        )
        .expect("lenient binding never fails on conversion");
        assert_eq!(sizes, [1]);
    });

    let dropped = layer.events_with_message("dropped unconvertible token");
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].level, Level::WARN);
    assert_eq!(dropped[0].field("token"), Some("huge"));
}
