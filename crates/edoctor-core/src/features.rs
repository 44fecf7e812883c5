//! Raw form strings to validated, named feature structs.
//!
//! Classifiers consume features positionally, so the declared order of
//! [`MATERNAL_FIELDS`] and [`FETAL_FIELDS`] is part of the artifact contract.
//! Conversion to a dense vector happens only at the classifier boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EDoctorError, Result};

/// Field name to raw user-entered text.
pub type RawForm = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label }
}

pub const MATERNAL_FIELDS: [FieldSpec; 5] = [
    field("age", "Age of the Person"),
    field("diastolic_bp", "diastolicBP in mmHg"),
    field("blood_sugar", "Blood glucose in mmol/L"),
    field("body_temp", "Body Temperature in Celsius"),
    field("heart_rate", "Heart rate in beats per minute"),
];

pub const FETAL_FIELDS: [FieldSpec; 21] = [
    field("baseline_value", "Baseline Value"),
    field("accelerations", "Accelerations"),
    field("fetal_movement", "Fetal Movement"),
    field("uterine_contractions", "Uterine Contractions"),
    field("light_decelerations", "Light Decelerations"),
    field("severe_decelerations", "Severe Decelerations"),
    field("prolongued_decelerations", "Prolongued Decelerations"),
    field(
        "abnormal_short_term_variability",
        "Abnormal Short Term Variability",
    ),
    field(
        "mean_value_of_short_term_variability",
        "Mean Value Of Short Term Variability",
    ),
    field(
        "percentage_of_time_with_abnormal_long_term_variability",
        "Percentage Of Time With ALTV",
    ),
    field(
        "mean_value_of_long_term_variability",
        "Mean Value Of Long Term Variability",
    ),
    field("histogram_width", "Histogram Width"),
    field("histogram_min", "Histogram Min"),
    field("histogram_max", "Histogram Max"),
    field("histogram_number_of_peaks", "Histogram Number Of Peaks"),
    field("histogram_number_of_zeroes", "Histogram Number Of Zeroes"),
    field("histogram_mode", "Histogram Mode"),
    field("histogram_mean", "Histogram Mean"),
    field("histogram_median", "Histogram Median"),
    field("histogram_variance", "Histogram Variance"),
    field("histogram_tendency", "Histogram Tendency"),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaternalVitals {
    pub age: f64,
    pub diastolic_bp: f64,
    pub blood_sugar: f64,
    pub body_temp: f64,
    pub heart_rate: f64,
}

impl MaternalVitals {
    pub fn from_form(form: &RawForm) -> Result<Self> {
        let [age, diastolic_bp, blood_sugar, body_temp, heart_rate] =
            parse_fields(form, &MATERNAL_FIELDS)?;
        Ok(Self {
            age,
            diastolic_bp,
            blood_sugar,
            body_temp,
            heart_rate,
        })
    }

    /// Order: age, diastolic BP, blood sugar, body temperature, heart rate.
    #[must_use]
    pub fn to_features(&self) -> [f64; 5] {
        [
            self.age,
            self.diastolic_bp,
            self.blood_sugar,
            self.body_temp,
            self.heart_rate,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FetalCardiotocogram {
    pub baseline_value: f64,
    pub accelerations: f64,
    pub fetal_movement: f64,
    pub uterine_contractions: f64,
    pub light_decelerations: f64,
    pub severe_decelerations: f64,
    pub prolongued_decelerations: f64,
    pub abnormal_short_term_variability: f64,
    pub mean_value_of_short_term_variability: f64,
    pub percentage_of_time_with_abnormal_long_term_variability: f64,
    pub mean_value_of_long_term_variability: f64,
    pub histogram_width: f64,
    pub histogram_min: f64,
    pub histogram_max: f64,
    pub histogram_number_of_peaks: f64,
    pub histogram_number_of_zeroes: f64,
    pub histogram_mode: f64,
    pub histogram_mean: f64,
    pub histogram_median: f64,
    pub histogram_variance: f64,
    pub histogram_tendency: f64,
}

impl FetalCardiotocogram {
    pub fn from_form(form: &RawForm) -> Result<Self> {
        let [
            baseline_value,
            accelerations,
            fetal_movement,
            uterine_contractions,
            light_decelerations,
            severe_decelerations,
            prolongued_decelerations,
            abnormal_short_term_variability,
            mean_value_of_short_term_variability,
            percentage_of_time_with_abnormal_long_term_variability,
            mean_value_of_long_term_variability,
            histogram_width,
            histogram_min,
            histogram_max,
            histogram_number_of_peaks,
            histogram_number_of_zeroes,
            histogram_mode,
            histogram_mean,
            histogram_median,
            histogram_variance,
            histogram_tendency,
        ] = parse_fields(form, &FETAL_FIELDS)?;
        Ok(Self {
            baseline_value,
            accelerations,
            fetal_movement,
            uterine_contractions,
            light_decelerations,
            severe_decelerations,
            prolongued_decelerations,
            abnormal_short_term_variability,
            mean_value_of_short_term_variability,
            percentage_of_time_with_abnormal_long_term_variability,
            mean_value_of_long_term_variability,
            histogram_width,
            histogram_min,
            histogram_max,
            histogram_number_of_peaks,
            histogram_number_of_zeroes,
            histogram_mode,
            histogram_mean,
            histogram_median,
            histogram_variance,
            histogram_tendency,
        })
    }

    /// Same order as [`FETAL_FIELDS`].
    #[must_use]
    pub fn to_features(&self) -> [f64; 21] {
        [
            self.baseline_value,
            self.accelerations,
            self.fetal_movement,
            self.uterine_contractions,
            self.light_decelerations,
            self.severe_decelerations,
            self.prolongued_decelerations,
            self.abnormal_short_term_variability,
            self.mean_value_of_short_term_variability,
            self.percentage_of_time_with_abnormal_long_term_variability,
            self.mean_value_of_long_term_variability,
            self.histogram_width,
            self.histogram_min,
            self.histogram_max,
            self.histogram_number_of_peaks,
            self.histogram_number_of_zeroes,
            self.histogram_mode,
            self.histogram_mean,
            self.histogram_median,
            self.histogram_variance,
            self.histogram_tendency,
        ]
    }
}

/// Flatten a JSON object of field values into a raw form.
///
/// Strings are kept as typed, numbers keep their JSON spelling and `null`
/// counts as missing. Anything else is rejected under its own field name.
pub fn form_from_json(value: &Value) -> Result<RawForm> {
    let Value::Object(object) = value else {
        return Err(EDoctorError::validation(
            "fields",
            "expected a JSON object of field values",
        ));
    };
    let mut form = RawForm::new();
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::String(text) => {
                form.insert(key.clone(), text.clone());
            }
            Value::Number(number) => {
                form.insert(key.clone(), number.to_string());
            }
            Value::Bool(_) => {
                return Err(EDoctorError::validation(
                    key.as_str(),
                    "expected a string or number, got a boolean",
                ));
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(EDoctorError::validation(
                    key.as_str(),
                    "expected a string or number, got a nested value",
                ));
            }
        }
    }
    Ok(form)
}

/// Parse every declared field in order, failing on the first bad one.
fn parse_fields<const N: usize>(form: &RawForm, fields: &[FieldSpec; N]) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, spec) in values.iter_mut().zip(fields) {
        *slot = parse_field(form, spec.key)?;
    }
    Ok(values)
}

fn parse_field(form: &RawForm, key: &str) -> Result<f64> {
    let raw = form.get(key).map(|value| value.trim()).unwrap_or_default();
    if raw.is_empty() {
        return Err(EDoctorError::validation(key, "value is required"));
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| EDoctorError::validation(key, format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(EDoctorError::validation(
            key,
            format!("'{raw}' is not a finite number"),
        ));
    }
    Ok(value)
}
