use serde::Serialize;

use edoctor_core::Prediction;

#[derive(Debug, Serialize)]
pub struct PredictionResponse<T> {
    pub flow: &'static str,
    pub prediction: Prediction<T>,
}
