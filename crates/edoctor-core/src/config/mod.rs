use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::error::{EDoctorError, Result};

mod env;

pub const ARTIFACT_DIR_ENV: &str = "EDOCTOR_ARTIFACT_DIR";
pub const DATASET_URL_ENV: &str = "EDOCTOR_DATASET_URL";
pub const DATASET_API_KEY_ENV: &str = "EDOCTOR_DATASET_API_KEY";
pub const FETCH_TIMEOUT_MS_ENV: &str = "EDOCTOR_FETCH_TIMEOUT_MS";

pub const DEFAULT_ARTIFACT_DIR: &str = "model";
pub const DEFAULT_DATASET_URL: &str =
    "https://api.data.gov.in/resource/6d6a373a-4529-43e0-9cff-f39aa8aa5957";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

pub const MATERNAL_MODEL_FILE: &str = "finalized_maternal_model.json";
pub const FETAL_MODEL_FILE: &str = "fetal_health_model.json";
pub const MATERNAL_SCALER_FILE: &str = "maternal_scaler.json";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub artifacts: ArtifactConfig,
    pub dataset: DatasetConfig,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            artifacts: ArtifactConfig::from_env(),
            dataset: DatasetConfig::from_env(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
        }
    }
}

impl ArtifactConfig {
    #[must_use]
    pub fn from_env() -> Self {
        env::read_non_empty_env(ARTIFACT_DIR_ENV)
            .map(|dir| Self {
                dir: PathBuf::from(dir),
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn maternal_model_path(&self) -> PathBuf {
        self.dir.join(MATERNAL_MODEL_FILE)
    }

    #[must_use]
    pub fn fetal_model_path(&self) -> PathBuf {
        self.dir.join(FETAL_MODEL_FILE)
    }

    #[must_use]
    pub fn maternal_scaler_path(&self) -> PathBuf {
        self.dir.join(MATERNAL_SCALER_FILE)
    }
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DATASET_URL.to_string(),
            api_key: None,
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl DatasetConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::read_non_empty_env(DATASET_URL_ENV)
                .unwrap_or_else(|| DEFAULT_DATASET_URL.to_string()),
            api_key: env::read_non_empty_env(DATASET_API_KEY_ENV),
            timeout_ms: env::parse_positive_u64(
                env::read_env_u64(FETCH_TIMEOUT_MS_ENV),
                DEFAULT_FETCH_TIMEOUT_MS,
            ),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the CSV endpoint, replacing any `api-key`/`format` pairs already
    /// present on the base URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| EDoctorError::Config(format!("invalid dataset url: {err}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(EDoctorError::Config(format!(
                    "unsupported dataset url scheme: {other}"
                )));
            }
        }
        let retained = url
            .query_pairs()
            .filter(|(key, _)| key != "api-key" && key != "format")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect::<Vec<_>>();
        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                pairs.append_pair("api-key", api_key);
            }
            pairs.append_pair("format", "csv");
        }
        Ok(url)
    }
}
