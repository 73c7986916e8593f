use std::path::PathBuf;

use super::*;

fn base_config() -> AppConfig {
    AppConfig {
        data_dir: PathBuf::from("./Data"),
        rounds: vec![3, 4],
        output_path: PathBuf::from("persona_results.json"),
        log_level: "info".to_string(),
        seed: 42,
        n_init: 10,
        max_iter: 300,
    }
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["personas-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["personas-cli", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

    let err = Cli::try_parse_from(["personas-cli", "analyze", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn analyze_defaults_to_config_values() {
    let cli = Cli::try_parse_from(["personas-cli", "analyze"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            rounds: None,
            data_dir: None,
            output: None,
            seed: None,
            dry_run: false
        })
    ));
}

#[test]
fn analyze_accepts_all_flags() {
    let cli = Cli::try_parse_from([
        "personas-cli",
        "analyze",
        "--rounds",
        "1,2,3",
        "--data-dir",
        "/srv/data",
        "--output",
        "out.json",
        "--seed",
        "7",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            rounds: Some(ref r),
            data_dir: Some(ref d),
            output: Some(ref o),
            seed: Some(7),
            dry_run: true
        }) if r == "1,2,3" && d == &PathBuf::from("/srv/data") && o == &PathBuf::from("out.json")
    ));
}

#[test]
fn analyze_rejects_non_numeric_seed() {
    assert!(Cli::try_parse_from(["personas-cli", "analyze", "--seed", "abc"]).is_err());
}

#[test]
fn report_input_is_optional() {
    let cli = Cli::try_parse_from(["personas-cli", "report"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { input: None })
    ));

    let cli = Cli::try_parse_from(["personas-cli", "report", "--input", "r.json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { input: Some(ref p) }) if p == &PathBuf::from("r.json")
    ));
}

#[test]
fn overrides_replace_config_values() {
    let config = apply_overrides(
        base_config(),
        Some("1, 2"),
        Some(PathBuf::from("/data")),
        Some(PathBuf::from("x.json")),
        Some(5),
    )
    .unwrap();
    assert_eq!(config.rounds, vec![1, 2]);
    assert_eq!(config.data_dir, PathBuf::from("/data"));
    assert_eq!(config.output_path, PathBuf::from("x.json"));
    assert_eq!(config.seed, 5);
}

#[test]
fn missing_overrides_keep_config() {
    let config = apply_overrides(base_config(), None, None, None, None).unwrap();
    assert_eq!(config, base_config());
}

#[test]
fn invalid_round_override_is_an_error() {
    let err = apply_overrides(base_config(), Some("1,x"), None, None, None).unwrap_err();
    assert!(err.to_string().contains("--rounds"), "got {err}");
}
