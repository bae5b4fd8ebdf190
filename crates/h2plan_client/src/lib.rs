//! Async client for the hydrogen-project optimization worker
//!
//! Builds on `h2plan_core` to drive the remote worker: sweep submission and
//! the polling state machine around it, sensitivity/contour exploration, and
//! AI-assisted recommendation requests. All remote operations are
//! non-blocking; per-job polls are serialized, stale poll responses are
//! discarded, and cancellation is fire-and-forget relative to the polling
//! loop.

#![warn(clippy::all)]

pub mod advisor;
pub mod error;
pub mod orchestrator;
pub mod sensitivity;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use advisor::RecommendationAdvisor;
pub use error::{ClientError, ClientResult, TransportError};
pub use orchestrator::{
    GridSearchOrchestrator, JobHandle, JobWatch, PollOutcome, SweepSpec,
};
pub use sensitivity::{Exploration, SensitivityExplorer};
pub use transport::{HttpWorkerClient, WorkerApi};
