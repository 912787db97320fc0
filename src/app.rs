//! Application state and the end-to-end evaluation flow:
//! irradiance fetch -> profile -> classification -> financial model ->
//! best-effort location label.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::domain::{DisplacementMode, FeasibilityAssumptions, GeoLocation};
use crate::engine::{EngineError, FeasibilityResult, ResourceClass, SolarProfile};
use crate::report::{self, ReportContext};
use crate::source::{
    IrradianceSource, LocationLabeler, NasaPowerClient, NominatimClient, SourceError,
};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One evaluation request with all defaults already merged in.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub tilt_gain_factor: f64,
    pub displacement: DisplacementMode,
    pub assumptions: FeasibilityAssumptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub tier: ResourceClass,
    pub description: &'static str,
}

/// A completed evaluation, ready for JSON serialization or report
/// rendering. Derived once per request and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub evaluation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub location: GeoLocation,
    pub displacement: DisplacementMode,
    pub classification: Classification,
    pub assumptions: FeasibilityAssumptions,
    pub profile: SolarProfile,
    pub result: FeasibilityResult,
}

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    source: Arc<dyn IrradianceSource>,
    labeler: Arc<dyn LocationLabeler>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let source = Arc::new(NasaPowerClient::new(&cfg.data)?);
        let labeler = Arc::new(NominatimClient::new(&cfg.geocode)?);
        Ok(Self::with_collaborators(cfg, source, labeler))
    }

    pub fn with_collaborators(
        cfg: Config,
        source: Arc<dyn IrradianceSource>,
        labeler: Arc<dyn LocationLabeler>,
    ) -> Self {
        Self {
            cfg,
            source,
            labeler,
        }
    }

    /// Run a full feasibility evaluation.
    ///
    /// Assumptions are validated up front and a failed irradiance fetch
    /// aborts before the engine runs; the label lookup is best-effort and
    /// never fails the evaluation.
    pub async fn evaluate(&self, req: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        req.assumptions.validate().map_err(EngineError::from)?;

        let irradiance = self
            .source
            .fetch_climatology(req.latitude, req.longitude)
            .await?;
        let profile = SolarProfile::build(&irradiance, req.tilt_gain_factor)?;
        let tier = ResourceClass::from_annual_poa(profile.annual_poa_kwh_m2);
        let result = FeasibilityResult::compute(profile.annual_poa_kwh_m2, &req.assumptions);

        let mut location = GeoLocation::new(req.latitude, req.longitude);
        location.name = self
            .labeler
            .reverse_label(req.latitude, req.longitude)
            .await;

        info!(
            latitude = req.latitude,
            longitude = req.longitude,
            tier = %tier,
            annual_poa_kwh_m2 = profile.annual_poa_kwh_m2,
            "feasibility evaluation complete"
        );

        Ok(Evaluation {
            evaluation_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            location,
            displacement: req.displacement,
            classification: Classification {
                tier,
                description: tier.description(),
            },
            assumptions: req.assumptions.clone(),
            profile,
            result,
        })
    }

    /// Render an evaluation as the plain-text report document.
    pub fn render_report(&self, evaluation: &Evaluation) -> String {
        report::render(&ReportContext {
            location: &evaluation.location,
            displacement: evaluation.displacement,
            profile: &evaluation.profile,
            assumptions: &evaluation.assumptions,
            result: &evaluation.result,
            classification: evaluation.classification.tier,
        })
    }
}
