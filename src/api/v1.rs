use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::error::ApiError,
    app::{AppState, Evaluation, EvaluationRequest},
    config::AssumptionsConfig,
    domain::DisplacementMode,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/feasibility", get(get_feasibility))
        .route("/report", get(get_report))
        .route("/healthz", get(healthz))
        .with_state(state)
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

/// Query parameters for a feasibility evaluation. Anything beyond the
/// coordinates is optional and falls back to the configured defaults.
#[derive(Debug, Deserialize, Validate)]
pub struct FeasibilityQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub longitude: f64,
    pub tilt_gain_factor: Option<f64>,
    pub displacement: Option<DisplacementMode>,
    pub system_size_kwp: Option<f64>,
    pub performance_ratio: Option<f64>,
    pub capex_per_kwp: Option<f64>,
    pub tariff_per_kwh: Option<f64>,
    pub om_percent_of_capex: Option<f64>,
    pub project_life_years: Option<u32>,
    pub discount_rate_percent: Option<f64>,
    pub capex_subsidy_percent: Option<f64>,
    /// Explicit emission factor; overrides the displacement-mode lookup.
    pub emission_factor_kg_per_kwh: Option<f64>,
}

impl FeasibilityQuery {
    fn into_request(self, defaults: &AssumptionsConfig) -> Result<EvaluationRequest, ApiError> {
        self.validate()?;

        let displacement = self.displacement.unwrap_or_default();
        let mut assumptions = defaults.to_assumptions(displacement);

        if let Some(v) = self.system_size_kwp {
            assumptions.system_size_kwp = v;
        }
        if let Some(v) = self.performance_ratio {
            assumptions.performance_ratio = v;
        }
        if let Some(v) = self.capex_per_kwp {
            assumptions.capex_per_kwp = v;
        }
        if let Some(v) = self.tariff_per_kwh {
            assumptions.tariff_per_kwh = v;
        }
        if let Some(v) = self.om_percent_of_capex {
            assumptions.om_percent_of_capex = v;
        }
        if let Some(v) = self.project_life_years {
            assumptions.project_life_years = v;
        }
        if let Some(v) = self.discount_rate_percent {
            assumptions.discount_rate_percent = v;
        }
        if let Some(v) = self.capex_subsidy_percent {
            assumptions.capex_subsidy_percent = v;
        }
        if let Some(v) = self.emission_factor_kg_per_kwh {
            assumptions.emission_factor_kg_per_kwh = v;
        }

        Ok(EvaluationRequest {
            latitude: self.latitude,
            longitude: self.longitude,
            tilt_gain_factor: self.tilt_gain_factor.unwrap_or(defaults.tilt_gain_factor),
            displacement,
            assumptions,
        })
    }
}

pub async fn get_feasibility(
    State(st): State<AppState>,
    Query(q): Query<FeasibilityQuery>,
) -> Result<Json<Evaluation>, ApiError> {
    let req = q.into_request(&st.cfg.assumptions)?;
    let evaluation = st.evaluate(&req).await?;
    Ok(Json(evaluation))
}

pub async fn get_report(
    State(st): State<AppState>,
    Query(q): Query<FeasibilityQuery>,
) -> Result<Response, ApiError> {
    let req = q.into_request(&st.cfg.assumptions)?;
    let evaluation = st.evaluate(&req).await?;
    let document = st.render_report(&evaluation);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        document,
    )
        .into_response())
}
