//! Dense KPI-based ranking of sweep results
//!
//! Rank 1 is the best result under the active criterion: highest NPV or IRR,
//! lowest LCOH. Ties keep their submission order (stable sort), so re-ranking
//! an already-ranked list is a no-op.

use std::cmp::Ordering;

use crate::model::{GridSearchResultItem, TargetKpi};

/// Sort `results` by `kpi` and assign dense 1-based ranks in place.
pub fn rank_results(results: &mut [GridSearchResultItem], kpi: TargetKpi) {
    results.sort_by(|a, b| {
        let ordering = kpi
            .value_of(a)
            .partial_cmp(&kpi.value_of(b))
            .unwrap_or(Ordering::Equal);
        if kpi.is_minimized() {
            ordering
        } else {
            ordering.reverse()
        }
    });
    for (position, item) in results.iter_mut().enumerate() {
        item.rank = (position + 1) as u32;
    }
}

/// Whether `results` carry the dense 1..=N ranks a completed job must have.
pub fn is_densely_ranked(results: &[GridSearchResultItem]) -> bool {
    results
        .iter()
        .enumerate()
        .all(|(position, item)| item.rank == (position + 1) as u32)
}
