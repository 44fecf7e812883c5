use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::parsers::parse_field_assignment;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8501)]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlowArg {
    Maternal,
    Fetal,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(value_enum)]
    pub flow: FlowArg,
    /// JSON object of field values; `-` reads stdin.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Single field value, applied after `--input`. Repeatable.
    #[arg(long = "field", value_parser = parse_field_assignment)]
    pub fields: Vec<(String, String)>,
}
