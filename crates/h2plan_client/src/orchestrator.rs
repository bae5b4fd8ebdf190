//! Grid search orchestration: submit, poll, cancel
//!
//! One sweep is owned by one [`JobHandle`]. Polls for a job are serialized
//! (`poll_once` takes `&mut self`, and the background watcher owns its
//! handle), so no two snapshots for the same job are ever in flight at once.
//! Snapshot application is monotonic: a response whose
//! `completed_combinations` regressed behind the retained snapshot is
//! discarded as stale, and a terminal snapshot latches.
//!
//! Cancellation is fire-and-forget relative to polling: the loop keeps
//! polling until it independently observes a terminal status, and a job that
//! completes before the worker sees the cancellation is a normal outcome,
//! not an error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use h2plan_core::catalog::VariableCatalog;
use h2plan_core::combinatorics;
use h2plan_core::config::BaseInput;
use h2plan_core::model::{JobStatus, TargetKpi, VariableRange};

use crate::error::{ClientError, ClientResult, TransportError};
use crate::transport::WorkerApi;
use crate::wire::{GridSearchJob, SweepRequest};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Monte Carlo depth the worker accepts per combination.
const MIN_ITERATIONS: u32 = 100;
const MAX_ITERATIONS: u32 = 5_000;

/// Everything needed to submit one sweep.
#[derive(Debug, Clone)]
pub struct SweepSpec {
    pub base_input: BaseInput,
    pub ranges: Vec<VariableRange>,
    pub target_kpi: TargetKpi,
    pub monte_carlo_iterations: u32,
    pub max_combinations: u64,
}

/// Validates and submits sweeps against a shared worker connection.
pub struct GridSearchOrchestrator<C> {
    worker: Arc<C>,
    catalog: Arc<VariableCatalog>,
}

impl<C: WorkerApi + 'static> GridSearchOrchestrator<C> {
    pub fn new(worker: Arc<C>, catalog: Arc<VariableCatalog>) -> Self {
        Self { worker, catalog }
    }

    /// Validate the spec entirely client-side, then submit.
    ///
    /// A sweep whose combination count exceeds `max_combinations` is
    /// rejected with the violating size before any network call; nothing is
    /// ever partially submitted or silently truncated.
    pub async fn start(&self, spec: SweepSpec) -> ClientResult<JobHandle<C>> {
        self.validate(&spec)?;

        let request = SweepRequest {
            base_input: spec.base_input,
            variable_ranges: spec.ranges,
            target_kpi: spec.target_kpi,
            monte_carlo_iterations: spec
                .monte_carlo_iterations
                .clamp(MIN_ITERATIONS, MAX_ITERATIONS),
            max_combinations: spec.max_combinations,
        };
        let snapshot = self.worker.submit_sweep(&request).await?;
        info!(
            job_id = %snapshot.job_id,
            total_combinations = snapshot.total_combinations,
            "sweep submitted"
        );

        Ok(JobHandle {
            job_id: snapshot.job_id.clone(),
            worker: Arc::clone(&self.worker),
            snapshot,
        })
    }

    fn validate(&self, spec: &SweepSpec) -> ClientResult<()> {
        if spec.ranges.is_empty() {
            return Err(ClientError::Validation {
                field: "variable_ranges".to_string(),
                message: "at least one variable range is required".to_string(),
            });
        }
        for range in &spec.ranges {
            range.validate()?;
            if !self.catalog.contains(&range.name) {
                return Err(ClientError::Validation {
                    field: "variable_ranges".to_string(),
                    message: format!("unknown variable '{}'", range.name),
                });
            }
        }

        let total = combinatorics::combination_count(&spec.ranges);
        if total > spec.max_combinations {
            return Err(ClientError::CombinationLimitExceeded {
                total,
                limit: spec.max_combinations,
            });
        }
        Ok(())
    }
}

/// What a single poll did to the retained snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Fresh snapshot applied, job still in flight
    Applied,
    /// Response arrived behind the retained snapshot and was discarded
    Stale,
    /// The retained snapshot is terminal
    Terminal,
}

/// Exclusive owner of one sweep's client-side state.
#[derive(Debug)]
pub struct JobHandle<C> {
    job_id: String,
    worker: Arc<C>,
    snapshot: GridSearchJob,
}

impl<C: WorkerApi + 'static> JobHandle<C> {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// The latest applied snapshot.
    pub fn snapshot(&self) -> &GridSearchJob {
        &self.snapshot
    }

    /// Fetch and apply one status snapshot. Idempotent; safe to call on a
    /// fixed interval until [`PollOutcome::Terminal`].
    pub async fn poll_once(&mut self) -> Result<PollOutcome, TransportError> {
        let incoming = self.worker.poll_sweep(&self.job_id).await?;
        Ok(self.apply(incoming))
    }

    fn apply(&mut self, incoming: GridSearchJob) -> PollOutcome {
        if self.snapshot.status.is_terminal() {
            return PollOutcome::Terminal;
        }
        if !incoming.status.is_terminal()
            && incoming.completed_combinations < self.snapshot.completed_combinations
        {
            debug!(
                job_id = %self.job_id,
                retained = self.snapshot.completed_combinations,
                incoming = incoming.completed_combinations,
                "discarding stale poll response"
            );
            return PollOutcome::Stale;
        }

        // replace wholesale so concurrent readers never see a partial update
        let terminal = incoming.status.is_terminal();
        self.snapshot = incoming;
        if terminal {
            info!(job_id = %self.job_id, status = ?self.snapshot.status, "sweep reached terminal state");
            PollOutcome::Terminal
        } else {
            PollOutcome::Applied
        }
    }

    /// Ask the worker to cancel. Best-effort: polling continues until a
    /// terminal status is observed, and a late `completed` is accepted.
    pub async fn cancel(&self) -> Result<(), TransportError> {
        info!(job_id = %self.job_id, "requesting sweep cancellation");
        self.worker.cancel_sweep(&self.job_id).await
    }

    /// Poll on `interval` until the job is terminal. Transport errors are
    /// logged and the loop continues on the next tick.
    pub async fn wait(&mut self, interval: Duration) -> &GridSearchJob {
        loop {
            match self.poll_once().await {
                Ok(PollOutcome::Terminal) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(job_id = %self.job_id, error = %err, "poll failed; retrying next tick");
                }
            }
            tokio::time::sleep(interval).await;
        }
        &self.snapshot
    }

    /// The terminal snapshot, or the worker's failure message as an error.
    pub fn require_completed(&self) -> ClientResult<&GridSearchJob> {
        match self.snapshot.status {
            JobStatus::Failed => Err(ClientError::Worker(
                self.snapshot
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "worker reported failure without a message".to_string()),
            )),
            _ => Ok(&self.snapshot),
        }
    }

    /// Run the polling loop as an explicit repeating task bound to this
    /// handle, publishing each applied snapshot on a watch channel.
    ///
    /// Dropping (or aborting) the returned [`JobWatch`] stops the task only;
    /// it does not cancel the remote job.
    pub fn watch(self, interval: Duration) -> JobWatch {
        let (tx, rx) = watch::channel(self.snapshot.clone());
        let mut handle = self;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match handle.poll_once().await {
                    Ok(PollOutcome::Stale) => {}
                    Ok(PollOutcome::Applied) => {
                        let _ = tx.send(handle.snapshot.clone());
                    }
                    Ok(PollOutcome::Terminal) => {
                        let _ = tx.send(handle.snapshot.clone());
                        break;
                    }
                    Err(err) => {
                        warn!(job_id = %handle.job_id, error = %err, "poll failed; retrying next tick");
                    }
                }
            }
        });
        JobWatch { rx, task }
    }
}

/// A cancellable polling task and the snapshot stream it feeds.
#[derive(Debug)]
pub struct JobWatch {
    rx: watch::Receiver<GridSearchJob>,
    task: JoinHandle<()>,
}

impl JobWatch {
    pub fn subscribe(&self) -> watch::Receiver<GridSearchJob> {
        self.rx.clone()
    }

    pub fn latest(&self) -> GridSearchJob {
        self.rx.borrow().clone()
    }

    /// Stop polling. Distinct from cancelling the remote job.
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for JobWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockWorker, running, terminal};
    use h2plan_core::model::JobStatus;

    fn catalog() -> Arc<VariableCatalog> {
        Arc::new(VariableCatalog::standard())
    }

    fn capex_range(min: f64, max: f64, step: f64) -> VariableRange {
        VariableRange::new("capex", "CAPEX", min, max, step, "KRW").unwrap()
    }

    fn spec(ranges: Vec<VariableRange>, max_combinations: u64) -> SweepSpec {
        SweepSpec {
            base_input: BaseInput::default(),
            ranges,
            target_kpi: TargetKpi::NpvP50,
            monte_carlo_iterations: 1000,
            max_combinations,
        }
    }

    #[tokio::test]
    async fn test_combination_limit_rejected_before_any_network_call() {
        let worker = Arc::new(MockWorker::default());
        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());

        // 10e9..30e9 step 10e9 -> 3 samples > limit of 2
        let result = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 2))
            .await;

        match result {
            Err(ClientError::CombinationLimitExceeded { total, limit }) => {
                assert_eq!(total, 3);
                assert_eq!(limit, 2);
            }
            other => panic!("expected CombinationLimitExceeded, got {other:?}"),
        }
        assert_eq!(worker.submit_calls(), 0, "must fail fast, before submission");
    }

    #[tokio::test]
    async fn test_empty_ranges_rejected() {
        let worker = Arc::new(MockWorker::default());
        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());

        let result = orchestrator.start(spec(Vec::new(), 100)).await;
        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(worker.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_variable_rejected() {
        let worker = Arc::new(MockWorker::default());
        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());

        let range = VariableRange::new("frobnication", "?", 0.0, 1.0, 1.0, "").unwrap();
        let result = orchestrator.start(spec(vec![range], 100)).await;
        assert!(matches!(result, Err(ClientError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_start_returns_pending_handle() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());

        let handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();
        assert_eq!(handle.job_id(), "job-1");
        assert_eq!(handle.snapshot().status, JobStatus::Pending);
        assert_eq!(worker.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_iterations_are_clamped_on_submission() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());

        let mut sweep = spec(vec![capex_range(10e9, 30e9, 10e9)], 100);
        sweep.monte_carlo_iterations = 50_000;
        orchestrator.start(sweep).await.unwrap();

        assert_eq!(worker.last_submit().unwrap().monte_carlo_iterations, 5_000);
    }

    #[tokio::test]
    async fn test_out_of_order_poll_response_is_discarded() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        worker.push_poll(Ok(running("job-1", JobStatus::Running, 10)));
        worker.push_poll(Ok(running("job-1", JobStatus::Running, 5)));
        worker.push_poll(Ok(terminal("job-1", JobStatus::Completed)));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let mut handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        assert_eq!(handle.poll_once().await.unwrap(), PollOutcome::Applied);
        assert_eq!(handle.snapshot().completed_combinations, 10);

        // the delayed earlier response arrives after the later one
        assert_eq!(handle.poll_once().await.unwrap(), PollOutcome::Stale);
        assert_eq!(handle.snapshot().completed_combinations, 10);

        assert_eq!(handle.poll_once().await.unwrap(), PollOutcome::Terminal);
        assert_eq!(handle.snapshot().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_terminal_snapshot_latches() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        worker.push_poll(Ok(terminal("job-1", JobStatus::Completed)));
        worker.push_poll(Ok(running("job-1", JobStatus::Running, 1)));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let mut handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        assert_eq!(handle.poll_once().await.unwrap(), PollOutcome::Terminal);
        // anything after a terminal snapshot is ignored
        assert_eq!(handle.poll_once().await.unwrap(), PollOutcome::Terminal);
        assert_eq!(handle.snapshot().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_wait_survives_transport_errors() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        worker.push_poll(Err(TransportError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }));
        worker.push_poll(Ok(running("job-1", JobStatus::Running, 2)));
        worker.push_poll(Ok(terminal("job-1", JobStatus::Completed)));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let mut handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        let snapshot = handle.wait(Duration::from_millis(1)).await;
        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(worker.poll_calls(), 3);
    }

    #[tokio::test]
    async fn test_cancellation_race_accepts_late_completion() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        worker.push_poll(Ok(terminal("job-1", JobStatus::Completed)));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let mut handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        // cancel, then observe the job finishing anyway
        handle.cancel().await.unwrap();
        assert_eq!(worker.cancel_calls(), vec!["job-1".to_string()]);

        let snapshot = handle.wait(Duration::from_millis(1)).await;
        assert_eq!(snapshot.status, JobStatus::Completed);
        assert!(handle.require_completed().is_ok());
    }

    #[tokio::test]
    async fn test_failed_job_surfaces_worker_message() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        let mut failed = terminal("job-1", JobStatus::Failed);
        failed.error_message = Some("simulation diverged".to_string());
        worker.push_poll(Ok(failed));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let mut handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        handle.wait(Duration::from_millis(1)).await;
        match handle.require_completed() {
            Err(ClientError::Worker(message)) => assert_eq!(message, "simulation diverged"),
            other => panic!("expected Worker error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_watch_publishes_until_terminal_and_stops() {
        let worker = Arc::new(MockWorker::default());
        worker.push_submit(Ok(running("job-1", JobStatus::Pending, 0)));
        worker.push_poll(Ok(running("job-1", JobStatus::Running, 1)));
        worker.push_poll(Ok(terminal("job-1", JobStatus::Completed)));

        let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), catalog());
        let handle = orchestrator
            .start(spec(vec![capex_range(10e9, 30e9, 10e9)], 100))
            .await
            .unwrap();

        let watch = handle.watch(Duration::from_millis(1));
        let mut rx = watch.subscribe();

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                rx.changed().await.unwrap();
                if rx.borrow().status.is_terminal() {
                    break;
                }
            }
        })
        .await
        .expect("watch task should reach the terminal snapshot");

        assert_eq!(watch.latest().status, JobStatus::Completed);
        assert_eq!(worker.poll_calls(), 2);
    }
}
