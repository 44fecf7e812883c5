use std::sync::Arc;

use crate::artifact::ArtifactStore;
use crate::charts::{self, Dashboard};
use crate::config::{AppConfig, DatasetConfig};
use crate::dataset::{DatasetFetcher, HealthTable};
use crate::error::Result;
use crate::features::{FetalCardiotocogram, MaternalVitals, RawForm};
use crate::prediction::{self, FetalHealth, MaternalRisk, Prediction};

/// Process-wide context: artifacts loaded once, shared read-only by every request.
#[derive(Clone)]
pub struct EDoctor {
    artifacts: Arc<ArtifactStore>,
    fetcher: DatasetFetcher,
}

impl std::fmt::Debug for EDoctor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EDoctor")
            .field("artifacts", &self.artifacts)
            .field("dataset_url", &self.fetcher.config().base_url)
            .finish_non_exhaustive()
    }
}

impl EDoctor {
    /// Load every artifact; failure here means predictions cannot be served.
    pub fn new(config: AppConfig) -> Result<Self> {
        let artifacts = ArtifactStore::load(&config.artifacts)?;
        Ok(Self::with_artifacts(artifacts, config.dataset))
    }

    #[must_use]
    pub fn with_artifacts(artifacts: ArtifactStore, dataset: DatasetConfig) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            fetcher: DatasetFetcher::new(dataset),
        }
    }

    #[must_use]
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn predict_maternal(&self, form: &RawForm) -> Result<Prediction<MaternalRisk>> {
        let vitals = MaternalVitals::from_form(form)?;
        prediction::predict_maternal(&self.artifacts, &vitals)
    }

    pub fn predict_fetal(&self, form: &RawForm) -> Result<Prediction<FetalHealth>> {
        let ctg = FetalCardiotocogram::from_form(form)?;
        prediction::predict_fetal(&self.artifacts, &ctg)
    }

    /// Fresh fetch every call; nothing is cached between views.
    pub fn fetch_health_table(&self) -> Result<HealthTable> {
        self.fetcher.fetch_health_table()
    }

    pub fn load_dashboard(&self) -> Result<Dashboard> {
        charts::load_dashboard(&self.fetcher)
    }
}
