use super::*;
use clap::Parser;

#[test]
fn predict_parses_flow_and_repeated_fields() {
    let cli = Cli::try_parse_from([
        "edoctor",
        "predict",
        "maternal",
        "--field",
        "age=25",
        "--field",
        "heart_rate = 80",
    ])
    .expect("parse");
    match cli.command {
        Commands::Predict(PredictArgs {
            flow,
            input,
            fields,
        }) => {
            assert_eq!(flow, FlowArg::Maternal);
            assert!(input.is_none());
            assert_eq!(
                fields,
                vec![
                    ("age".to_string(), "25".to_string()),
                    ("heart_rate".to_string(), "80".to_string()),
                ]
            );
        }
        _ => panic!("expected predict command"),
    }
}

#[test]
fn predict_rejects_field_without_equals() {
    let parsed = Cli::try_parse_from(["edoctor", "predict", "fetal", "--field", "accelerations"]);
    assert!(parsed.is_err(), "field without `=` must be rejected");
}

#[test]
fn predict_rejects_empty_field_name() {
    let parsed = Cli::try_parse_from(["edoctor", "predict", "fetal", "--field", "=3"]);
    assert!(parsed.is_err(), "empty field name must be rejected");
}

#[test]
fn predict_rejects_unknown_flow() {
    let parsed = Cli::try_parse_from(["edoctor", "predict", "diabetes"]);
    assert!(parsed.is_err(), "unknown flow must be rejected");
}

#[test]
fn serve_defaults_to_loopback() {
    let cli = Cli::try_parse_from(["edoctor", "serve"]).expect("parse");
    match cli.command {
        Commands::Serve(ServeArgs { host, port }) => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 8501);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn global_artifacts_flag_is_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["edoctor", "artifacts", "--artifacts", "/tmp/models"])
        .expect("parse");
    assert!(matches!(cli.command, Commands::Artifacts));
    assert_eq!(
        cli.artifacts.as_deref(),
        Some(std::path::Path::new("/tmp/models"))
    );
}
