//! Tests for command line argument parsing

use crate::app::cli::args::*;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_replay_arguments() {
    let args = Args::try_parse_from([
        "mediaindex",
        "replay",
        "--fixture",
        "demos/examplechan.json",
        "--link",
        "https://t.me/examplechan/150",
        "--skip",
        "5",
    ])
    .unwrap();

    assert_eq!(
        args.command,
        Command::Replay(ReplayArgs {
            fixture: PathBuf::from("demos/examplechan.json"),
            link: "https://t.me/examplechan/150".to_string(),
            skip: "5".to_string(),
            operator: None,
            cancel_after: None,
        })
    );
}

#[test]
fn test_skip_defaults_to_zero() {
    let args = Args::try_parse_from([
        "mediaindex",
        "replay",
        "--fixture",
        "f.json",
        "--link",
        "https://t.me/c/123/4",
    ])
    .unwrap();

    let Command::Replay(replay) = args.command else {
        panic!("expected replay");
    };
    assert_eq!(replay.skip, "0");
}

#[test]
fn test_negative_operator_id_is_accepted() {
    let args = Args::try_parse_from([
        "mediaindex",
        "replay",
        "--fixture",
        "f.json",
        "--link",
        "x",
        "--operator",
        "-100",
    ])
    .unwrap();

    let Command::Replay(replay) = args.command else {
        panic!("expected replay");
    };
    assert_eq!(replay.operator, Some(-100));
}

#[test]
fn test_global_options_after_subcommand() {
    let args = Args::try_parse_from([
        "mediaindex",
        "check-config",
        "-vv",
        "-q",
        "--log-format",
        "json",
        "-c",
        "custom.toml",
    ])
    .unwrap();

    assert_eq!(args.command, Command::CheckConfig);
    assert_eq!(args.verbosity(), 1);
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.config_file, Some(PathBuf::from("custom.toml")));
}

#[test]
fn test_color_choice() {
    let plain = Args::try_parse_from(["mediaindex", "check-config"]).unwrap();
    assert_eq!(plain.color_choice(), None);

    let forced = Args::try_parse_from(["mediaindex", "--color", "check-config"]).unwrap();
    assert_eq!(forced.color_choice(), Some(true));

    let disabled = Args::try_parse_from(["mediaindex", "--no-color", "check-config"]).unwrap();
    assert_eq!(disabled.color_choice(), Some(false));

    assert!(Args::try_parse_from(["mediaindex", "--color", "--no-color", "check-config"]).is_err());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(Args::try_parse_from(["mediaindex", "-l", "loud", "check-config"]).is_err());
    assert!(Args::try_parse_from(["mediaindex", "-o", "yaml", "check-config"]).is_err());
    assert!(Args::try_parse_from(["mediaindex"]).is_err());
    assert!(Args::try_parse_from(["mediaindex", "replay", "--link", "x"]).is_err());
}
