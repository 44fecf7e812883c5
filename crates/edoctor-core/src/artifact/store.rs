use std::path::Path;

use serde::Serialize;

use super::{Classifier, ClassifierArtifact, FeatureScaler, ScalerArtifact, read_artifact};
use crate::config::ArtifactConfig;
use crate::error::{EDoctorError, Result};
use crate::features::{FETAL_FIELDS, MATERNAL_FIELDS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub name: String,
    pub path: String,
    pub kind: String,
    pub n_features: usize,
    pub digest: String,
}

/// The three artifacts the prediction flows need, loaded once at process start.
pub struct ArtifactStore {
    maternal_model: Box<dyn Classifier>,
    fetal_model: Box<dyn Classifier>,
    maternal_scaler: Box<dyn FeatureScaler>,
    summaries: Vec<ArtifactSummary>,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("summaries", &self.summaries)
            .finish_non_exhaustive()
    }
}

impl ArtifactStore {
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let maternal_width = MATERNAL_FIELDS.len();
        let fetal_width = FETAL_FIELDS.len();

        let (maternal_model, maternal_summary) = load_classifier(
            "maternal_model",
            &config.maternal_model_path(),
            maternal_width,
        )?;
        let (fetal_model, fetal_summary) =
            load_classifier("fetal_model", &config.fetal_model_path(), fetal_width)?;
        let (maternal_scaler, scaler_summary) = load_scaler(
            "maternal_scaler",
            &config.maternal_scaler_path(),
            maternal_width,
        )?;

        let summaries = vec![maternal_summary, fetal_summary, scaler_summary];
        for summary in &summaries {
            tracing::info!(
                artifact = %summary.name,
                path = %summary.path,
                kind = %summary.kind,
                digest = %summary.digest,
                "artifact loaded"
            );
        }

        Ok(Self {
            maternal_model: Box::new(maternal_model),
            fetal_model: Box::new(fetal_model),
            maternal_scaler: Box::new(maternal_scaler),
            summaries,
        })
    }

    /// Assemble a store from already-constructed parts, e.g. in-process models.
    pub fn from_parts(
        maternal_model: Box<dyn Classifier>,
        fetal_model: Box<dyn Classifier>,
        maternal_scaler: Box<dyn FeatureScaler>,
    ) -> Result<Self> {
        check_width("maternal_model", maternal_model.n_features(), MATERNAL_FIELDS.len())?;
        check_width("fetal_model", fetal_model.n_features(), FETAL_FIELDS.len())?;
        check_width(
            "maternal_scaler",
            maternal_scaler.n_features(),
            MATERNAL_FIELDS.len(),
        )?;
        Ok(Self {
            maternal_model,
            fetal_model,
            maternal_scaler,
            summaries: Vec::new(),
        })
    }

    pub fn maternal_model(&self) -> &dyn Classifier {
        self.maternal_model.as_ref()
    }

    pub fn fetal_model(&self) -> &dyn Classifier {
        self.fetal_model.as_ref()
    }

    pub fn maternal_scaler(&self) -> &dyn FeatureScaler {
        self.maternal_scaler.as_ref()
    }

    pub fn summaries(&self) -> &[ArtifactSummary] {
        &self.summaries
    }
}

fn load_classifier(
    name: &str,
    path: &Path,
    expected_features: usize,
) -> Result<(ClassifierArtifact, ArtifactSummary)> {
    let raw = read_artifact::<ClassifierArtifact>(path)?;
    raw.body
        .validate()
        .map_err(|reason| EDoctorError::artifact_load(path, reason))?;
    let n_features = raw.body.n_features();
    if n_features != expected_features {
        return Err(EDoctorError::artifact_load(
            path,
            format!("expects {n_features} features, flow provides {expected_features}"),
        ));
    }
    let summary = summarize(name, path, raw.body.kind(), n_features, raw.digest);
    Ok((raw.body, summary))
}

fn load_scaler(
    name: &str,
    path: &Path,
    expected_features: usize,
) -> Result<(ScalerArtifact, ArtifactSummary)> {
    let raw = read_artifact::<ScalerArtifact>(path)?;
    raw.body
        .validate()
        .map_err(|reason| EDoctorError::artifact_load(path, reason))?;
    let n_features = raw.body.n_features();
    if n_features != expected_features {
        return Err(EDoctorError::artifact_load(
            path,
            format!("expects {n_features} features, flow provides {expected_features}"),
        ));
    }
    let summary = summarize(name, path, raw.body.kind(), n_features, raw.digest);
    Ok((raw.body, summary))
}

fn summarize(
    name: &str,
    path: &Path,
    kind: &str,
    n_features: usize,
    digest: String,
) -> ArtifactSummary {
    ArtifactSummary {
        name: name.to_string(),
        path: path.display().to_string(),
        kind: kind.to_string(),
        n_features,
        digest,
    }
}

fn check_width(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        return Ok(());
    }
    Err(EDoctorError::artifact_load(
        name,
        format!("expects {actual} features, flow provides {expected}"),
    ))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::artifact::{LinearClassifier, StandardScaler, encode_artifact};

    fn constant_linear(n_features: usize, label_index: usize) -> ClassifierArtifact {
        let mut intercepts = vec![0.0; 3];
        intercepts[label_index] = 1.0;
        ClassifierArtifact::Linear(LinearClassifier {
            n_features,
            classes: vec![0, 1, 2],
            coefficients: vec![vec![0.0; n_features]; 3],
            intercepts,
        })
    }

    fn write_artifacts(dir: &Path) {
        fs::write(
            dir.join("finalized_maternal_model.json"),
            encode_artifact(&constant_linear(5, 1)).expect("encode maternal"),
        )
        .expect("write maternal");
        fs::write(
            dir.join("fetal_health_model.json"),
            encode_artifact(&constant_linear(21, 2)).expect("encode fetal"),
        )
        .expect("write fetal");
        fs::write(
            dir.join("maternal_scaler.json"),
            encode_artifact(&ScalerArtifact::Standard(StandardScaler::identity(5)))
                .expect("encode scaler"),
        )
        .expect("write scaler");
    }

    #[test]
    fn load_reads_all_three_artifacts_with_digests() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let store = ArtifactStore::load(&ArtifactConfig::in_dir(temp.path())).expect("load");
        let names = store
            .summaries()
            .iter()
            .map(|summary| summary.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["maternal_model", "fetal_model", "maternal_scaler"]);
        assert!(store.summaries().iter().all(|s| s.digest.len() == 64));
        assert_eq!(store.maternal_model().n_features(), 5);
        assert_eq!(store.fetal_model().n_features(), 21);
    }

    #[test]
    fn load_fails_when_artifact_is_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::remove_file(temp.path().join("fetal_health_model.json")).expect("remove fetal");

        let err = ArtifactStore::load(&ArtifactConfig::in_dir(temp.path())).expect_err("missing");
        assert_eq!(err.code(), "ARTIFACT_LOAD_FAILED");
        assert!(err.to_string().contains("fetal_health_model.json"));
    }

    #[test]
    fn load_fails_when_artifact_is_corrupt() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::write(temp.path().join("maternal_scaler.json"), b"\x80\x04pickle").expect("corrupt");

        let err = ArtifactStore::load(&ArtifactConfig::in_dir(temp.path())).expect_err("corrupt");
        assert!(err.to_string().contains("corrupt artifact"));
    }

    #[test]
    fn load_rejects_unknown_format_version() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::write(
            temp.path().join("maternal_scaler.json"),
            r#"{"format_version": 7, "kind": "standard", "mean": [0,0,0,0,0], "scale": [1,1,1,1,1]}"#,
        )
        .expect("rewrite scaler");

        let err = ArtifactStore::load(&ArtifactConfig::in_dir(temp.path())).expect_err("version");
        assert!(err.to_string().contains("format_version 7"));
    }

    #[test]
    fn load_rejects_classifier_with_wrong_feature_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::write(
            temp.path().join("finalized_maternal_model.json"),
            encode_artifact(&constant_linear(4, 0)).expect("encode"),
        )
        .expect("rewrite maternal");

        let err = ArtifactStore::load(&ArtifactConfig::in_dir(temp.path())).expect_err("width");
        assert!(err.to_string().contains("expects 4 features"));
    }

    #[test]
    fn from_parts_checks_flow_widths() {
        let err = ArtifactStore::from_parts(
            Box::new(constant_linear(5, 0)),
            Box::new(constant_linear(5, 0)),
            Box::new(StandardScaler::identity(5)),
        )
        .expect_err("fetal width");
        assert!(err.to_string().contains("fetal_model"));
    }
}
