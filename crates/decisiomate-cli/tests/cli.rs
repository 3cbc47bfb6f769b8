use clap::Parser;
use decisiomate_cli::{Cli, Commands};
use decisiomate_model::ArtifactPolicy;
use std::ffi::OsStr;
use std::path::PathBuf;

#[test]
fn cli_parses_serve_flags() {
    let cli = Cli::try_parse_from([
        "decisiomate",
        "serve",
        "--host",
        "0.0.0.0",
        "--port",
        "9000",
        "--weights",
        "/models/w.json",
        "--artifact-policy",
        "cached",
    ])
    .unwrap();

    let Commands::Serve(cmd) = cli.command else {
        panic!("expected serve");
    };
    assert_eq!(cmd.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(cmd.port, Some(9000));
    assert_eq!(cmd.weights, Some(PathBuf::from("/models/w.json")));
    assert_eq!(cmd.artifact_policy, Some(ArtifactPolicy::Cached));

    let config = cmd.server_config().unwrap();
    assert_eq!(config.socket_addr(), "0.0.0.0:9000");
}

#[test]
fn cli_rejects_unknown_policy() {
    let result = Cli::try_parse_from(["decisiomate", "serve", "--artifact-policy", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_predict_flags() {
    let cli = Cli::try_parse_from([
        "decisiomate",
        "-v",
        "predict",
        "--sample",
        "--set",
        "ram=3900",
        "-s",
        "battery_power=600",
        "--json",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 1);
    assert_eq!(cli.log_directives(), vec!["decisiomate=debug"]);
    let Commands::Predict(cmd) = cli.command else {
        panic!("expected predict");
    };
    assert!(cmd.sample);
    assert!(cmd.json);
    assert_eq!(cmd.set.len(), 2);

    let fields = cmd.fields().unwrap();
    assert_eq!(fields["ram"], "3900");
    assert_eq!(fields["battery_power"], "600");
}

#[test]
fn cli_rejects_malformed_set() {
    let result = Cli::try_parse_from(["decisiomate", "predict", "--set", "ram"]);
    assert!(result.is_err());
}

#[test]
fn cli_predicts_with_bundled_artifacts() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rec_data");
    let weights = root.join("mobile_price_prediction_weights.json");
    let scaler = root.join("scaler.json");

    let cli = Cli::try_parse_from([
        OsStr::new("decisiomate"),
        OsStr::new("predict"),
        OsStr::new("--sample"),
        OsStr::new("--weights"),
        weights.as_os_str(),
        OsStr::new("--scaler"),
        scaler.as_os_str(),
    ])
    .unwrap();

    let Commands::Predict(cmd) = cli.command else {
        panic!("expected predict");
    };
    cmd.run().unwrap();
}

#[test]
fn cli_parses_features() {
    let cli = Cli::try_parse_from(["decisiomate", "features", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::Features(cmd) if cmd.json));
    assert_eq!(cli.verbose, 0);
}
