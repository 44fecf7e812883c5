// Public fallible APIs in this crate share one concrete error contract (`EDoctorError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod artifact;
pub mod charts;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod prediction;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::EDoctor;
pub use error::{EDoctorError, Result};
pub use prediction::{FetalHealth, MaternalRisk, Prediction, RiskTier};
