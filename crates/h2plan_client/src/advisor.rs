//! AI-assisted recommendation requests and their application
//!
//! The worker's AI pass proposes parameter sets toward a set of KPI goals.
//! Proposed inputs come back as heterogeneous maps in whatever casing the
//! model produced; applying one to a base configuration goes through the
//! recommendation normalizer, which reports unapplied keys instead of
//! failing the merge.

use std::sync::Arc;

use h2plan_core::catalog::VariableCatalog;
use h2plan_core::config::BaseInput;
use h2plan_core::model::{TargetSet, VariableConstraint};
use h2plan_core::recommend::{self, AppliedRecommendation};

use crate::error::{ClientError, ClientResult};
use crate::transport::WorkerApi;
use crate::wire::{AiOptimizeRequest, AiOptimizeResponse, AiRecommendation};

/// Iteration bounds the worker accepts for the AI search.
const MIN_AI_ITERATIONS: u32 = 1;
const MAX_AI_ITERATIONS: u32 = 10;

pub struct RecommendationAdvisor<C> {
    worker: Arc<C>,
    catalog: Arc<VariableCatalog>,
}

impl<C: WorkerApi> RecommendationAdvisor<C> {
    pub fn new(worker: Arc<C>, catalog: Arc<VariableCatalog>) -> Self {
        Self { worker, catalog }
    }

    pub async fn optimize(
        &self,
        base_input: BaseInput,
        targets: TargetSet,
        constraints: Vec<VariableConstraint>,
        use_sensitivity: bool,
        max_iterations: u32,
    ) -> ClientResult<AiOptimizeResponse> {
        for constraint in &constraints {
            if !self.catalog.contains(&constraint.name) {
                return Err(ClientError::Validation {
                    field: "constraints".to_string(),
                    message: format!("unknown variable '{}'", constraint.name),
                });
            }
        }

        let request = AiOptimizeRequest {
            base_input,
            targets: targets.into_targets(),
            constraints,
            use_sensitivity,
            max_iterations: max_iterations.clamp(MIN_AI_ITERATIONS, MAX_AI_ITERATIONS),
        };
        Ok(self.worker.ai_optimize(&request).await?)
    }

    /// Merge one recommendation into `base`; unknown or non-numeric keys are
    /// reported in the outcome, never raised.
    pub fn apply(
        &self,
        base: &BaseInput,
        recommendation: &AiRecommendation,
    ) -> AppliedRecommendation {
        recommend::apply_recommendation(base, &recommendation.recommended_input, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::MockWorker;
    use h2plan_core::model::{Kpi, TargetCondition};
    use h2plan_core::recommend::UnappliedReason;

    fn advisor(worker: &Arc<MockWorker>) -> RecommendationAdvisor<MockWorker> {
        RecommendationAdvisor::new(Arc::clone(worker), Arc::new(VariableCatalog::standard()))
    }

    fn npv_target() -> TargetSet {
        TargetSet::new([(Kpi::Npv, TargetCondition::AtLeast, 1.0e9)]).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_constraint_rejected_before_submission() {
        let worker = Arc::new(MockWorker::default());
        let advisor = advisor(&worker);

        let constraint = VariableConstraint {
            name: "warp_factor".to_string(),
            min_value: None,
            max_value: None,
            fixed_value: Some(9.0),
        };
        let result = advisor
            .optimize(BaseInput::default(), npv_target(), vec![constraint], true, 5)
            .await;
        assert!(matches!(result, Err(ClientError::Validation { .. })));
    }

    #[test]
    fn test_apply_coerces_and_reports_unapplied() {
        let worker = Arc::new(MockWorker::default());
        let advisor = advisor(&worker);

        let recommendation = AiRecommendation {
            rank: 1,
            recommended_input: match json!({
                "electrolyzer_capacity": "12.5",
                "foo_bar": 1
            }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            },
            expected_kpis: Default::default(),
            reasoning: String::new(),
            confidence: 0.7,
            trade_offs: Vec::new(),
        };

        let outcome = advisor.apply(&BaseInput::default(), &recommendation);
        assert_eq!(outcome.input.equipment.electrolyzer_capacity, 12.5);
        assert_eq!(outcome.unapplied.len(), 1);
        assert_eq!(outcome.unapplied[0].key, "foo_bar");
        assert_eq!(outcome.unapplied[0].reason, UnappliedReason::UnknownVariable);
    }
}
