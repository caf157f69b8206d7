//! Test generators: mock `NarrativeGenerator` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use questline_narrative::domain::generator::{
    GenerationRequest, GeneratorError, NarrativeGenerator, TurnResult,
};

/// A generator that replays a fixed script of results and records every
/// request it receives. Once the script runs out it reports
/// `GeneratorError::Unavailable`.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<TurnResult, GeneratorError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    /// Create a generator that returns `script` in order.
    #[must_use]
    pub fn new(script: Vec<Result<TurnResult, GeneratorError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a generator that succeeds with each of `turns` in order.
    #[must_use]
    pub fn returning(turns: Vec<TurnResult>) -> Self {
        Self::new(turns.into_iter().map(Ok).collect())
    }

    /// Sleeps for `delay` before answering each request.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues another result at the end of the script.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, result: Result<TurnResult, GeneratorError>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<TurnResult, GeneratorError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::Unavailable("script exhausted".into())))
    }
}

/// A generator that always fails with `GeneratorError::Unavailable`.
#[derive(Debug)]
pub struct FailingGenerator;

#[async_trait]
impl NarrativeGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<TurnResult, GeneratorError> {
        Err(GeneratorError::Unavailable("connection refused".into()))
    }
}
