use serde::{Deserialize, Serialize};

use crate::error::TargetSetError;

/// Marginal impact of one variable on the target KPI under a fixed
/// perturbation (the worker varies each variable ±20% around base).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRank {
    pub variable: String,
    pub display_name: String,
    /// Relative swing as a percentage, always >= 0
    pub impact_score: f64,
    /// Absolute NPV swing between the low and high case (KRW)
    pub npv_swing: f64,
    pub low_case_pct: f64,
    pub high_case_pct: f64,
}

/// KPI identity for goal seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kpi {
    Npv,
    Irr,
    Lcoh,
    Dscr,
}

impl Kpi {
    pub fn as_str(self) -> &'static str {
        match self {
            Kpi::Npv => "npv",
            Kpi::Irr => "irr",
            Kpi::Lcoh => "lcoh",
            Kpi::Dscr => "dscr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCondition {
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<=")]
    AtMost,
    #[serde(rename = "==")]
    Exactly,
}

/// One KPI goal for AI-assisted optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTarget {
    pub kpi: Kpi,
    pub condition: TargetCondition,
    pub value: f64,
    /// 1 = highest; assigned densely by position within a [`TargetSet`]
    pub priority: u8,
}

/// An ordered set of KPI targets with dense 1-based priorities.
///
/// At most one target per KPI, at most four targets; priority is derived
/// from submission order rather than supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TargetSet {
    targets: Vec<KpiTarget>,
}

impl TargetSet {
    pub const MAX_TARGETS: usize = 4;

    pub fn new(
        goals: impl IntoIterator<Item = (Kpi, TargetCondition, f64)>,
    ) -> Result<Self, TargetSetError> {
        let goals: Vec<_> = goals.into_iter().collect();
        if goals.is_empty() {
            return Err(TargetSetError::Empty);
        }
        if goals.len() > Self::MAX_TARGETS {
            return Err(TargetSetError::TooMany(goals.len()));
        }

        let mut targets: Vec<KpiTarget> = Vec::with_capacity(goals.len());
        for (position, (kpi, condition, value)) in goals.into_iter().enumerate() {
            if targets.iter().any(|t| t.kpi == kpi) {
                return Err(TargetSetError::DuplicateKpi(kpi));
            }
            targets.push(KpiTarget {
                kpi,
                condition,
                value,
                priority: (position + 1) as u8,
            });
        }
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &[KpiTarget] {
        &self.targets
    }

    pub fn into_targets(self) -> Vec<KpiTarget> {
        self.targets
    }
}

/// Bounds or a pin for one variable in an AI optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConstraint {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_value: Option<f64>,
}
