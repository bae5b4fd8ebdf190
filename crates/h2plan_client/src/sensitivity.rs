//! Sensitivity-driven exploration
//!
//! With no variables selected, the worker ranks every catalog variable by
//! marginal impact (±20% around base) and picks its own top two for the
//! contour pass; the caller decides whether to follow up. With exactly two
//! variables, the worker samples a resolution × resolution grid over their
//! catalog-bounded ranges. This client never auto-chains calls.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use h2plan_core::catalog::VariableCatalog;
use h2plan_core::config::BaseInput;
use h2plan_core::model::{SensitivityRank, TargetKpi};
use h2plan_core::projection::HeatmapGrid;

use crate::error::{ClientError, ClientResult};
use crate::transport::WorkerApi;
use crate::wire::ExploreRequest;

/// Practical contour resolution bounds; out-of-range requests are clamped,
/// not rejected.
pub const MIN_RESOLUTION: u32 = 5;
pub const MAX_RESOLUTION: u32 = 25;

/// Outcome of one exploration round.
#[derive(Debug, Clone)]
pub struct Exploration {
    /// Sorted descending by impact score; ties in catalog declaration order
    pub ranking: Vec<SensitivityRank>,
    /// What the worker actually varied (its own picks when the request left
    /// the selection empty)
    pub selected_variables: Vec<String>,
    pub contour: Option<HeatmapGrid>,
    pub optimal_region: Option<Value>,
    pub recommendations: Vec<String>,
}

pub struct SensitivityExplorer<C> {
    worker: Arc<C>,
    catalog: Arc<VariableCatalog>,
}

impl<C: WorkerApi> SensitivityExplorer<C> {
    pub fn new(worker: Arc<C>, catalog: Arc<VariableCatalog>) -> Self {
        Self { worker, catalog }
    }

    pub async fn explore(
        &self,
        base_input: BaseInput,
        selected_variables: Option<Vec<String>>,
        resolution: u32,
        target_kpi: TargetKpi,
    ) -> ClientResult<Exploration> {
        if let Some(names) = &selected_variables {
            if names.len() > 2 {
                return Err(ClientError::Validation {
                    field: "selected_variables".to_string(),
                    message: format!("at most two variables may be explored, got {}", names.len()),
                });
            }
            for name in names {
                if !self.catalog.contains(name) {
                    return Err(ClientError::Validation {
                        field: "selected_variables".to_string(),
                        message: format!("unknown variable '{name}'"),
                    });
                }
            }
        }

        let request = ExploreRequest {
            base_input,
            // an empty list means the same as none: let the worker choose
            selected_variables: selected_variables.filter(|names| !names.is_empty()),
            resolution: resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION),
            target_kpi,
        };
        let mut response = self.worker.explore(&request).await?;
        self.sort_ranking(&mut response.sensitivity_ranking);

        Ok(Exploration {
            ranking: response.sensitivity_ranking,
            selected_variables: response.selected_variables,
            contour: response.contour_data,
            optimal_region: response.optimal_region,
            recommendations: response.recommendations,
        })
    }

    /// Enforce the ordering invariant regardless of how the worker sorted:
    /// impact score descending, catalog declaration order on ties (stable).
    fn sort_ranking(&self, ranking: &mut [SensitivityRank]) {
        ranking.sort_by(|a, b| {
            b.impact_score
                .partial_cmp(&a.impact_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    self.declaration_order(&a.variable)
                        .cmp(&self.declaration_order(&b.variable))
                })
        });
    }

    fn declaration_order(&self, variable: &str) -> usize {
        self.catalog
            .declaration_index(variable)
            .unwrap_or(usize::MAX)
    }
}
