use serde::{Deserialize, Serialize};

use super::ensure_finite;
use crate::error::{EDoctorError, Result};

pub trait FeatureScaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
}

impl ScalerArtifact {
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Self::Standard(scaler) => scaler.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard(_) => "standard",
        }
    }
}

impl FeatureScaler for ScalerArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Standard(scaler) => scaler.n_features(),
        }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::Standard(scaler) => scaler.transform(features),
        }
    }
}

/// `(x - mean) / scale`, column-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    #[must_use]
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: vec![0.0; n_features],
            scale: vec![1.0; n_features],
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        ensure_finite(&self.mean, "mean")?;
        ensure_finite(&self.scale, "scale")?;
        if let Some(index) = self.scale.iter().position(|value| *value == 0.0) {
            return Err(format!("scale[{index}] is zero"));
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(EDoctorError::Internal(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                features.len()
            )));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}
