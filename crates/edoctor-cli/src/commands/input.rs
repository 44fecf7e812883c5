use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use edoctor_core::features::{RawForm, form_from_json};

/// Merge the optional JSON input with `--field` overrides into one raw form.
pub(super) fn load_form(input: Option<&Path>, fields: &[(String, String)]) -> Result<RawForm> {
    let mut form = match input {
        Some(path) => parse_input_form(&read_input(path)?)?,
        None => RawForm::new(),
    };
    for (key, value) in fields {
        form.insert(key.clone(), value.clone());
    }
    Ok(form)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read input from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read input {}", path.display()))
}

pub(super) fn parse_input_form(raw: &str) -> Result<RawForm> {
    let value: Value = serde_json::from_str(raw).context("input is not valid JSON")?;
    Ok(form_from_json(&value)?)
}
