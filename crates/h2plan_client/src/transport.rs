//! Transport seam to the optimization worker
//!
//! [`WorkerApi`] is the boundary the orchestrator and explorers are written
//! against; [`HttpWorkerClient`] is the production implementation. Tests
//! script the trait directly instead of standing up a server.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use h2plan_core::catalog::OptimizableVariable;

use crate::error::TransportError;
use crate::wire::{
    AiOptimizeRequest, AiOptimizeResponse, ExploreRequest, ExploreResponse, GridSearchJob,
    SweepRequest,
};

/// Remote operations the worker exposes. Every call resolves or rejects
/// within the transport's own timeout; none blocks indefinitely.
pub trait WorkerApi: Send + Sync {
    fn submit_sweep(
        &self,
        request: &SweepRequest,
    ) -> impl Future<Output = Result<GridSearchJob, TransportError>> + Send;

    fn poll_sweep(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<GridSearchJob, TransportError>> + Send;

    /// Fire-and-forget: the worker acknowledges without a body, and the job
    /// may still complete before the cancellation is observed.
    fn cancel_sweep(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn explore(
        &self,
        request: &ExploreRequest,
    ) -> impl Future<Output = Result<ExploreResponse, TransportError>> + Send;

    fn ai_optimize(
        &self,
        request: &AiOptimizeRequest,
    ) -> impl Future<Output = Result<AiOptimizeResponse, TransportError>> + Send;

    fn list_variables(
        &self,
    ) -> impl Future<Output = Result<Vec<OptimizableVariable>, TransportError>> + Send;
}

/// Contour and AI runs are synchronous on the worker side and can take a
/// while at high resolutions.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP implementation of [`WorkerApi`] against the worker's REST surface.
#[derive(Debug, Clone)]
pub struct HttpWorkerClient {
    http: Client,
    base_url: String,
}

impl HttpWorkerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(TransportError::Decode)
    }
}

impl WorkerApi for HttpWorkerClient {
    async fn submit_sweep(&self, request: &SweepRequest) -> Result<GridSearchJob, TransportError> {
        self.post_json("/api/optimization/grid-search", request).await
    }

    async fn poll_sweep(&self, job_id: &str) -> Result<GridSearchJob, TransportError> {
        self.get_json(&format!("/api/optimization/grid-search/{job_id}/status"))
            .await
    }

    async fn cancel_sweep(&self, job_id: &str) -> Result<(), TransportError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/optimization/grid-search/{job_id}")))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn explore(&self, request: &ExploreRequest) -> Result<ExploreResponse, TransportError> {
        self.post_json("/api/optimization/sensitivity-explore", request)
            .await
    }

    async fn ai_optimize(
        &self,
        request: &AiOptimizeRequest,
    ) -> Result<AiOptimizeResponse, TransportError> {
        self.post_json("/api/optimization/ai-optimize", request).await
    }

    async fn list_variables(&self) -> Result<Vec<OptimizableVariable>, TransportError> {
        self.get_json("/api/optimization/variables").await
    }
}
