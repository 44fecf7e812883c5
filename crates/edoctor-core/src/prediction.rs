use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactStore, Classifier, FeatureScaler};
use crate::error::{EDoctorError, Result};
use crate::features::{FetalCardiotocogram, MATERNAL_FIELDS, MaternalVitals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Green,
    Orange,
    Red,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

/// Named category for a classifier's integer output.
///
/// Labels map positionally: `0` is the first tier, `1` the second, and every
/// other value falls through to the highest tier.
pub trait RiskTier: Copy + std::fmt::Debug {
    fn from_class_label(label: i64) -> Self;

    fn display_label(self) -> &'static str;

    fn severity(self) -> Severity;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaternalRisk {
    Low,
    Medium,
    High,
}

impl RiskTier for MaternalRisk {
    fn from_class_label(label: i64) -> Self {
        match label {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }

    fn display_label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    fn severity(self) -> Severity {
        match self {
            Self::Low => Severity::Green,
            Self::Medium => Severity::Orange,
            Self::High => Severity::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetalHealth {
    Normal,
    Suspect,
    Pathological,
}

impl RiskTier for FetalHealth {
    fn from_class_label(label: i64) -> Self {
        match label {
            0 => Self::Normal,
            1 => Self::Suspect,
            _ => Self::Pathological,
        }
    }

    fn display_label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Suspect => "Suspect",
            Self::Pathological => "Pathological",
        }
    }

    fn severity(self) -> Severity {
        match self {
            Self::Normal => Severity::Green,
            Self::Suspect => Severity::Orange,
            Self::Pathological => Severity::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction<T> {
    pub tier: T,
    pub class_label: i64,
    pub label: String,
    pub severity: Severity,
    pub predicted_at: DateTime<Utc>,
}

impl<T: RiskTier> Prediction<T> {
    fn from_class_label(class_label: i64) -> Self {
        let tier = T::from_class_label(class_label);
        Self {
            tier,
            class_label,
            label: tier.display_label().to_string(),
            severity: tier.severity(),
            predicted_at: Utc::now(),
        }
    }
}

/// Scale the vitals, then classify with the maternal model.
pub fn predict_maternal(
    store: &ArtifactStore,
    vitals: &MaternalVitals,
) -> Result<Prediction<MaternalRisk>> {
    let scaled = store.maternal_scaler().transform(&vitals.to_features())?;
    ensure_scaled_finite(&scaled)?;
    let class_label = store.maternal_model().predict_one(&scaled)?;
    let prediction = Prediction::<MaternalRisk>::from_class_label(class_label);
    tracing::debug!(class_label, tier = ?prediction.tier, "maternal prediction");
    Ok(prediction)
}

fn ensure_scaled_finite(scaled: &[f64]) -> Result<()> {
    match scaled.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(EDoctorError::validation(
            MATERNAL_FIELDS.get(index).map_or("features", |spec| spec.key),
            "value is outside the range the model accepts",
        )),
        None => Ok(()),
    }
}

/// Classify the cardiotocogram directly; the fetal flow is unscaled.
pub fn predict_fetal(
    store: &ArtifactStore,
    ctg: &FetalCardiotocogram,
) -> Result<Prediction<FetalHealth>> {
    let class_label = store.fetal_model().predict_one(&ctg.to_features())?;
    let prediction = Prediction::<FetalHealth>::from_class_label(class_label);
    tracing::debug!(class_label, tier = ?prediction.tier, "fetal prediction");
    Ok(prediction)
}
