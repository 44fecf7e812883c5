use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod parsers;

#[cfg(test)]
mod tests;

pub use args::{FlowArg, PredictArgs, ServeArgs};

#[derive(Debug, Parser)]
#[command(name = "edoctor")]
#[command(about = "Maternal and fetal risk prediction with a maternal-health dashboard", version)]
pub struct Cli {
    /// Directory holding the model and scaler artifacts. Overrides `EDOCTOR_ARTIFACT_DIR`.
    #[arg(long, global = true)]
    pub artifacts: Option<PathBuf>,

    /// Dataset resource URL. Overrides `EDOCTOR_DATASET_URL`.
    #[arg(long, global = true)]
    pub dataset_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Serve(ServeArgs),
    Predict(PredictArgs),
    Dashboard,
    Artifacts,
}
