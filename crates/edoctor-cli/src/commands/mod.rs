use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use edoctor_core::EDoctor;
use edoctor_core::charts::load_dashboard;
use edoctor_core::config::{AppConfig, ArtifactConfig};
use edoctor_core::dataset::DatasetFetcher;

use crate::cli::{Cli, Commands, FlowArg, PredictArgs};

mod input;
mod web;


use self::input::load_form;
use self::web::{WebServeOptions, serve};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);
    match cli.command {
        Commands::Serve(args) => {
            let app = EDoctor::new(config).context("failed to load prediction artifacts")?;
            serve(
                app,
                WebServeOptions {
                    host: &args.host,
                    port: args.port,
                },
            )
        }
        Commands::Predict(args) => run_predict(config, &args),
        Commands::Dashboard => {
            let fetcher = DatasetFetcher::new(config.dataset);
            let dashboard = load_dashboard(&fetcher).context("failed to load dashboard")?;
            print_json(&dashboard)
        }
        Commands::Artifacts => {
            let app = EDoctor::new(config).context("failed to load artifacts")?;
            print_json(app.artifacts().summaries())
        }
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(dir) = &cli.artifacts {
        config.artifacts = ArtifactConfig::in_dir(dir);
    }
    if let Some(url) = &cli.dataset_url {
        config.dataset.base_url.clone_from(url);
    }
    tracing::debug!(
        artifacts = %config.artifacts.dir.display(),
        timeout_ms = config.dataset.timeout_ms,
        "configuration resolved"
    );
    config
}

fn run_predict(config: AppConfig, args: &PredictArgs) -> Result<()> {
    let form = load_form(args.input.as_deref(), &args.fields)?;
    let app = EDoctor::new(config).context("failed to load prediction artifacts")?;
    match args.flow {
        FlowArg::Maternal => {
            let prediction = app
                .predict_maternal(&form)
                .context("maternal prediction failed")?;
            print_json(&prediction)
        }
        FlowArg::Fetal => {
            let prediction = app
                .predict_fetal(&form)
                .context("fetal prediction failed")?;
            print_json(&prediction)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
