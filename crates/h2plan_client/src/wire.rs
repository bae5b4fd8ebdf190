//! Request/response contracts at the worker boundary
//!
//! Typed fields serialize straight to the worker's snake_case convention.
//! Fragments whose shape the worker does not guarantee (recommended inputs,
//! sensitivity references, optimal regions) stay as raw JSON and cross the
//! casing boundary through [`h2plan_core::casing`]. Snapshots headed for the
//! presentation layer are exported as camelCase view models via
//! [`to_view_model`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use h2plan_core::casing;
use h2plan_core::config::BaseInput;
use h2plan_core::model::{KpiTarget, SensitivityRank, TargetKpi, VariableConstraint, VariableRange};
use h2plan_core::projection::HeatmapGrid;

pub use h2plan_core::model::GridSearchJob;

/// `POST /api/optimization/grid-search`
#[derive(Debug, Clone, Serialize)]
pub struct SweepRequest {
    pub base_input: BaseInput,
    pub variable_ranges: Vec<VariableRange>,
    pub target_kpi: TargetKpi,
    pub monte_carlo_iterations: u32,
    pub max_combinations: u64,
}

/// `POST /api/optimization/sensitivity-explore`
#[derive(Debug, Clone, Serialize)]
pub struct ExploreRequest {
    pub base_input: BaseInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variables: Option<Vec<String>>,
    pub resolution: u32,
    pub target_kpi: TargetKpi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExploreResponse {
    pub status: String,
    #[serde(default)]
    pub sensitivity_ranking: Vec<SensitivityRank>,
    /// The variables the worker actually explored (its own top picks when
    /// the request left the selection empty)
    #[serde(default)]
    pub selected_variables: Vec<String>,
    #[serde(default)]
    pub contour_data: Option<HeatmapGrid>,
    #[serde(default)]
    pub optimal_region: Option<Value>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// `POST /api/optimization/ai-optimize`
#[derive(Debug, Clone, Serialize)]
pub struct AiOptimizeRequest {
    pub base_input: BaseInput,
    pub targets: Vec<KpiTarget>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<VariableConstraint>,
    pub use_sensitivity: bool,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiRecommendation {
    pub rank: u32,
    /// Heterogeneous key/value pairs; casing and aliases are resolved when
    /// the recommendation is applied to a base configuration
    pub recommended_input: Map<String, Value>,
    #[serde(default)]
    pub expected_kpis: HashMap<String, f64>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub trade_offs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiOptimizeResponse {
    pub status: String,
    #[serde(default)]
    pub recommendations: Vec<AiRecommendation>,
    #[serde(default)]
    pub analysis_summary: String,
    #[serde(default)]
    pub sensitivity_reference: Option<Value>,
    #[serde(default)]
    pub iterations_used: u32,
}

/// Serialize any wire value as a camelCase view model for the presentation
/// layer.
pub fn to_view_model<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    let wire = serde_json::to_value(value)?;
    Ok(casing::to_internal_format(&wire))
}
