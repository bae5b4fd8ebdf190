use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownKpi;
use crate::projection::HeatmapGrid;

/// Lifecycle state of a remote sweep job.
///
/// A job is created `pending`, moves to `running` once the worker picks it
/// up, and ends in exactly one of the terminal states. Transitions are only
/// ever observed through polled snapshots; the client never invents one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// The KPI a sweep is optimized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKpi {
    NpvP50,
    IrrP50,
    Lcoh,
}

impl TargetKpi {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKpi::NpvP50 => "npv_p50",
            TargetKpi::IrrP50 => "irr_p50",
            TargetKpi::Lcoh => "lcoh",
        }
    }

    /// Whether lower values are better for this KPI.
    pub fn is_minimized(self) -> bool {
        matches!(self, TargetKpi::Lcoh)
    }

    pub fn value_of(self, item: &GridSearchResultItem) -> f64 {
        match self {
            TargetKpi::NpvP50 => item.npv_p50,
            TargetKpi::IrrP50 => item.irr_p50,
            TargetKpi::Lcoh => item.lcoh,
        }
    }
}

impl FromStr for TargetKpi {
    type Err = UnknownKpi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npv_p50" => Ok(TargetKpi::NpvP50),
            "irr_p50" => Ok(TargetKpi::IrrP50),
            "lcoh" => Ok(TargetKpi::Lcoh),
            other => Err(UnknownKpi(other.to_string())),
        }
    }
}

/// One evaluated variable combination and its KPI outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResultItem {
    /// Variable name -> sampled value for this combination
    pub combination: HashMap<String, f64>,
    pub npv_p50: f64,
    pub npv_p90: f64,
    pub irr_p50: f64,
    pub lcoh: f64,
    pub dscr_min: f64,
    /// Annual hydrogen production (tonnes)
    pub annual_h2_production: f64,
    /// 1-based dense rank under the sweep's target KPI; 0 before ranking
    #[serde(default)]
    pub rank: u32,
}

/// A polled snapshot of a sweep job, as reported by the worker.
///
/// `best_result` is populated only once the job completes with a non-empty
/// result set, and `completed_combinations <= total_combinations` holds on
/// every snapshot the worker emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchJob {
    pub job_id: String,
    pub status: JobStatus,
    /// Percentage in [0, 100]
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub total_combinations: u64,
    #[serde(default)]
    pub completed_combinations: u64,
    #[serde(default)]
    pub results: Vec<GridSearchResultItem>,
    #[serde(default)]
    pub best_result: Option<GridSearchResultItem>,
    #[serde(default)]
    pub heatmap_data: Option<HeatmapGrid>,
    #[serde(default)]
    pub error_message: Option<String>,
}
