//! Scripted [`WorkerApi`] double for state-machine tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use h2plan_core::catalog::{OptimizableVariable, VariableCatalog};
use h2plan_core::model::JobStatus;

use crate::error::TransportError;
use crate::transport::WorkerApi;
use crate::wire::{
    AiOptimizeRequest, AiOptimizeResponse, ExploreRequest, ExploreResponse, GridSearchJob,
    SweepRequest,
};

/// Build an in-flight snapshot with the given completion count.
pub fn running(job_id: &str, status: JobStatus, completed: u64) -> GridSearchJob {
    GridSearchJob {
        job_id: job_id.to_string(),
        status,
        progress: completed as f64,
        total_combinations: 100,
        completed_combinations: completed,
        results: Vec::new(),
        best_result: None,
        heatmap_data: None,
        error_message: None,
    }
}

/// Build a terminal snapshot.
pub fn terminal(job_id: &str, status: JobStatus) -> GridSearchJob {
    GridSearchJob {
        job_id: job_id.to_string(),
        status,
        progress: 100.0,
        total_combinations: 100,
        completed_combinations: 100,
        results: Vec::new(),
        best_result: None,
        heatmap_data: None,
        error_message: None,
    }
}

/// Worker double fed with queued responses; calls are recorded so tests can
/// assert what went over the wire (or that nothing did).
#[derive(Debug, Default)]
pub struct MockWorker {
    submit_responses: Mutex<VecDeque<Result<GridSearchJob, TransportError>>>,
    poll_responses: Mutex<VecDeque<Result<GridSearchJob, TransportError>>>,
    explore_responses: Mutex<VecDeque<Result<ExploreResponse, TransportError>>>,
    optimize_responses: Mutex<VecDeque<Result<AiOptimizeResponse, TransportError>>>,
    submitted: Mutex<Vec<SweepRequest>>,
    polled: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
    explored: Mutex<Vec<ExploreRequest>>,
}

impl MockWorker {
    pub fn push_submit(&self, response: Result<GridSearchJob, TransportError>) {
        self.submit_responses.lock().unwrap().push_back(response);
    }

    pub fn push_poll(&self, response: Result<GridSearchJob, TransportError>) {
        self.poll_responses.lock().unwrap().push_back(response);
    }

    pub fn push_explore(&self, response: Result<ExploreResponse, TransportError>) {
        self.explore_responses.lock().unwrap().push_back(response);
    }

    pub fn push_optimize(&self, response: Result<AiOptimizeResponse, TransportError>) {
        self.optimize_responses.lock().unwrap().push_back(response);
    }

    pub fn submit_calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn last_submit(&self) -> Option<SweepRequest> {
        self.submitted.lock().unwrap().last().cloned()
    }

    pub fn poll_calls(&self) -> usize {
        self.polled.lock().unwrap().len()
    }

    pub fn cancel_calls(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn last_explore(&self) -> Option<ExploreRequest> {
        self.explored.lock().unwrap().last().cloned()
    }

    fn exhausted<T>() -> Result<T, TransportError> {
        Err(TransportError::Status {
            status: 500,
            body: "mock: no scripted response left".to_string(),
        })
    }
}

impl WorkerApi for MockWorker {
    async fn submit_sweep(&self, request: &SweepRequest) -> Result<GridSearchJob, TransportError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::exhausted)
    }

    async fn poll_sweep(&self, job_id: &str) -> Result<GridSearchJob, TransportError> {
        self.polled.lock().unwrap().push(job_id.to_string());
        self.poll_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::exhausted)
    }

    async fn cancel_sweep(&self, job_id: &str) -> Result<(), TransportError> {
        self.cancelled.lock().unwrap().push(job_id.to_string());
        Ok(())
    }

    async fn explore(&self, request: &ExploreRequest) -> Result<ExploreResponse, TransportError> {
        self.explored.lock().unwrap().push(request.clone());
        self.explore_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::exhausted)
    }

    async fn ai_optimize(
        &self,
        _request: &AiOptimizeRequest,
    ) -> Result<AiOptimizeResponse, TransportError> {
        self.optimize_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::exhausted)
    }

    async fn list_variables(&self) -> Result<Vec<OptimizableVariable>, TransportError> {
        Ok(VariableCatalog::standard().variables().to_vec())
    }
}
