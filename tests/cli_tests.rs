//! Command-line parsing, config resolution and output rendering

use clap::Parser;
use std::process::ExitCode;
use ternion::cli::{exit_code, read_source, render_consensus, render_header, Cli, Commands};
use ternion_core::{ConsensusResult, ProtocolHeader, ResultData, SourceResult, TaskResult, Trit};
use ternion_interp::LocalInterpreter;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

// ===========================================================================
// Argument parsing
// ===========================================================================

#[test]
fn parses_consensus_with_repeated_sources() {
    let cli = Cli::try_parse_from([
        "ternion",
        "consensus",
        "is it safe?",
        "--source",
        "claude",
        "-s",
        "gemini",
    ])
    .unwrap();
    match cli.command {
        Commands::Consensus { prompt, sources } => {
            assert_eq!(prompt, "is it safe?");
            assert_eq!(sources, vec!["claude", "gemini"]);
        }
        other => panic!("Expected Consensus, got {:?}", other),
    }
}

#[test]
fn consensus_sources_default_to_empty() {
    let cli = Cli::try_parse_from(["ternion", "consensus", "q"]).unwrap();
    let Commands::Consensus { sources, .. } = cli.command else {
        panic!("Expected Consensus");
    };
    assert!(sources.is_empty());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "ternion",
        "ask",
        "hello",
        "--model",
        "gpt4",
        "--url",
        "http://svc:1",
        "--timeout",
        "5",
        "--json",
    ])
    .unwrap();
    assert_eq!(cli.url.as_deref(), Some("http://svc:1"));
    assert_eq!(cli.timeout, Some(5));
    assert!(cli.json);
    let Commands::Ask { prompt, model } = cli.command else {
        panic!("Expected Ask");
    };
    assert_eq!(prompt, "hello");
    assert_eq!(model.as_deref(), Some("gpt4"));
}

#[test]
fn eval_accepts_stdin_marker() {
    let cli = Cli::try_parse_from(["ternion", "eval", "-"]).unwrap();
    assert!(matches!(cli.command, Commands::Eval { ref file } if file == "-"));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["ternion"]).is_err());
    assert!(Cli::try_parse_from(["ternion", "run"]).is_err());
}

// ===========================================================================
// Config resolution
// ===========================================================================

#[test]
fn explicit_config_file_then_flags() {
    let path = fixture("config.toml");
    let cli = Cli::try_parse_from([
        "ternion",
        "ping",
        "--config",
        path.as_str(),
        "--url",
        "http://override:1",
    ])
    .unwrap();
    let config = cli.resolve_config().unwrap();
    assert_eq!(config.base_url, "http://override:1");
    assert_eq!(config.timeout_secs, 12);
    assert_eq!(config.default_sources, vec!["claude", "gemini"]);
    assert_eq!(config.client_subject, "sdk-rs");
}

#[test]
fn timeout_flag_overrides_file() {
    let path = fixture("config.toml");
    let cli = Cli::try_parse_from([
        "ternion",
        "ping",
        "--config",
        path.as_str(),
        "--url",
        "http://127.0.0.1:9999",
        "--timeout",
        "3",
    ])
    .unwrap();
    assert_eq!(cli.resolve_config().unwrap().timeout_secs, 3);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let cli = Cli::try_parse_from(["ternion", "ping", "--config", path.to_str().unwrap()]).unwrap();
    assert!(cli.resolve_config().is_err());
}

#[test]
fn invalid_flags_fail_validation() {
    let path = fixture("config.toml");
    let zero = Cli::try_parse_from([
        "ternion", "ping", "--config", path.as_str(), "--url", "http://a", "--timeout", "0",
    ])
    .unwrap();
    assert!(zero.resolve_config().is_err());

    let bad_url =
        Cli::try_parse_from(["ternion", "ping", "--config", path.as_str(), "--url", "svc:80"]).unwrap();
    assert!(bad_url.resolve_config().is_err());
}

// ===========================================================================
// Sources
// ===========================================================================

#[test]
fn bilingual_fixtures_agree() {
    let interpreter = LocalInterpreter::new();
    let en = interpreter.eval_with_output(&read_source(&fixture("arith_en.tern")).unwrap());
    let ko = interpreter.eval_with_output(&read_source(&fixture("arith_ko.tern")).unwrap());

    assert!(en.result.is_success());
    assert_eq!(en.result.data(), &ResultData::Integer(85));
    assert_eq!(en.result.data(), ko.result.data());
    assert_eq!(en.output, vec!["85"]);
    assert_eq!(en.output, ko.output);
}

#[test]
fn unreadable_source_is_an_error() {
    assert!(read_source(&fixture("does-not-exist.tern")).is_err());
}

// ===========================================================================
// Rendering
// ===========================================================================

#[test]
fn header_rendering() {
    assert_eq!(
        render_header(&ProtocolHeader::all_success()),
        "PPPOOOOOO overall O(보류)"
    );
    assert_eq!(
        render_header(&ProtocolHeader::parse("PPT")),
        "PPTOOOOOO overall T(실패)"
    );
}

#[test]
fn consensus_rendering_lists_sources_in_order() {
    let per_source = vec![
        SourceResult {
            source: "claude".into(),
            result: TaskResult::success(ResultData::None, 5, 1),
        },
        SourceResult {
            source: "gpt4".into(),
            result: TaskResult::failed(ResultData::text("refused"), 7, 2),
        },
        SourceResult {
            source: "gemini".into(),
            result: TaskResult::success(ResultData::None, 6, 3),
        },
    ];
    let outcome = ConsensusResult::aggregate(per_source, 9);
    let text = render_consensus(&outcome);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("claude  "));
    assert!(lines[1].starts_with("gpt4    "));
    assert!(lines[2].starts_with("gemini  "));
    assert_eq!(lines[3], "consensus P(성공) header PPTPOOOOO [9ms]");
}

#[test]
fn only_failed_exits_nonzero() {
    let code = |t: Trit| format!("{:?}", exit_code(t));
    assert_eq!(code(Trit::Success), format!("{:?}", ExitCode::SUCCESS));
    assert_eq!(code(Trit::Pending), format!("{:?}", ExitCode::SUCCESS));
    assert_eq!(code(Trit::Failed), format!("{:?}", ExitCode::FAILURE));
}
