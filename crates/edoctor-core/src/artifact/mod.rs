//! Pre-trained artifacts exported to a neutral JSON format.
//!
//! Every artifact file is an envelope `{ "format_version": 1, "kind": ..., ... }`.
//! Loading validates structure up front so prediction never has to deal with a
//! malformed model.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EDoctorError, Result};

mod classifier;
mod scaler;
mod store;

pub use classifier::{Classifier, ClassifierArtifact, LinearClassifier, TreeEnsemble, TreeNode};
pub use scaler::{FeatureScaler, ScalerArtifact, StandardScaler};
pub use store::{ArtifactStore, ArtifactSummary};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ArtifactEnvelope<T> {
    pub(crate) format_version: u32,
    #[serde(flatten)]
    pub(crate) body: T,
}

pub(crate) struct RawArtifact<T> {
    pub(crate) body: T,
    pub(crate) digest: String,
}

pub(crate) fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<RawArtifact<T>> {
    let bytes = fs::read(path)
        .map_err(|err| EDoctorError::artifact_load(path, format!("cannot read file: {err}")))?;
    let envelope: ArtifactEnvelope<T> = serde_json::from_slice(&bytes)
        .map_err(|err| EDoctorError::artifact_load(path, format!("corrupt artifact: {err}")))?;
    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(EDoctorError::artifact_load(
            path,
            format!(
                "unsupported format_version {} (expected {ARTIFACT_FORMAT_VERSION})",
                envelope.format_version
            ),
        ));
    }
    Ok(RawArtifact {
        body: envelope.body,
        digest: blake3::hash(&bytes).to_hex().to_string(),
    })
}

/// Serialise an artifact body into the versioned envelope.
pub fn encode_artifact<T: Serialize>(body: &T) -> Result<String> {
    let envelope = ArtifactEnvelope {
        format_version: ARTIFACT_FORMAT_VERSION,
        body,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

fn ensure_finite(values: &[f64], what: &str) -> std::result::Result<(), String> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(format!("{what}[{index}] is not finite")),
        None => Ok(()),
    }
}
