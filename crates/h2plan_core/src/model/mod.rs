//! Value objects exchanged with the job worker
//!
//! Everything here is an owned value object: snapshots are replaced
//! wholesale, never mutated in place, so a renderer holding the previous
//! snapshot can never observe a half-applied update.

mod job;
mod ranges;
mod sensitivity;

pub use job::{GridSearchJob, GridSearchResultItem, JobStatus, TargetKpi};
pub use ranges::VariableRange;
pub use sensitivity::{
    Kpi, KpiTarget, SensitivityRank, TargetCondition, TargetSet, VariableConstraint,
};
