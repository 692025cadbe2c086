//! Consensus client — task submission, bounded history, multi-source voting
//!
//! Every call resolves to a [`TaskResult`]; transport problems become Failed
//! results instead of errors. The task counter and the history share one
//! lock so concurrent submits never reuse an id or lose an entry.

use crate::history::History;
use crate::http::HttpTransport;
use crate::status::state_from_response;
use crate::transport::{Transport, TransportError, TransportResult};
use std::sync::Arc;
use std::time::Instant;
use ternion_core::{
    AppTask, ClientConfig, ConsensusResult, ProtocolHeader, ResultData, SourceResult, TaskResult,
    TaskStats,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Task counter and history, mutated together.
struct Ledger {
    last_task_id: u64,
    history: History,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    /// Header sent with the next request; replaced by whatever header the
    /// service returns.
    header: RwLock<ProtocolHeader>,
    ledger: Mutex<Ledger>,
}

/// Cheaply cloneable handle; clones share one counter and one history.
#[derive(Clone)]
pub struct ConsensusClient {
    inner: Arc<ClientInner>,
}

impl ConsensusClient {
    /// Client talking HTTP to `config.base_url`.
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                header: RwLock::new(ProtocolHeader::all_success()),
                ledger: Mutex::new(Ledger {
                    last_task_id: 0,
                    history: History::new(),
                }),
            }),
        }
    }

    /// Replace the outgoing header. Waits out any reader on another clone.
    pub async fn with_header(self, header: ProtocolHeader) -> Self {
        self.set_header(header).await;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub async fn current_header(&self) -> ProtocolHeader {
        *self.inner.header.read().await
    }

    pub async fn set_header(&self, header: ProtocolHeader) {
        *self.inner.header.write().await = header;
    }

    async fn next_task_id(&self) -> u64 {
        let mut ledger = self.inner.ledger.lock().await;
        ledger.last_task_id += 1;
        ledger.last_task_id
    }

    async fn record(&self, result: TaskResult) {
        self.inner.ledger.lock().await.history.push(result);
    }

    /// Send one task. Never fails: transport errors come back as a Failed
    /// result, and every outcome is appended to the history.
    pub async fn submit(&self, task: AppTask) -> TaskResult {
        let task_id = self.next_task_id().await;
        let start = Instant::now();
        let header = self.current_header().await;
        let timeout = self.inner.config.timeout();

        debug!(task_id, subject = %task.subject, "submitting {} task", task.task_type);

        let outcome = match tokio::time::timeout(timeout, self.inner.transport.send(&task, &header)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(timeout.as_millis() as u64)),
        };
        let elapsed_ms = elapsed_ms(start);

        let result = match outcome {
            Ok(response) => {
                if let Some(returned) = response.header {
                    self.set_header(returned).await;
                }
                let state = state_from_response(&response.body);
                TaskResult::new(state, ResultData::Json(response.body), elapsed_ms, task_id)
            }
            Err(e) => {
                warn!(task_id, subject = %task.subject, "task failed: {}", e);
                TaskResult::failed(ResultData::Text(e.to_string()), elapsed_ms, task_id)
            }
        };

        info!(
            task_id,
            state = %result.state(),
            elapsed_ms,
            "{} task settled",
            task.task_type
        );
        self.record(result.clone()).await;
        result
    }

    /// Execute source on the remote service.
    pub async fn run(&self, source: &str) -> TaskResult {
        let task = AppTask::execute(self.inner.config.client_subject.clone(), source);
        self.submit(task).await
    }

    /// Compile source on the remote service.
    pub async fn compile(&self, source: &str) -> TaskResult {
        let task = AppTask::compile(self.inner.config.client_subject.clone(), source);
        self.submit(task).await
    }

    /// Prompt a language model; `source` defaults to the configured model.
    pub async fn ask(&self, prompt: &str, source: Option<&str>) -> TaskResult {
        let model = source.unwrap_or(&self.inner.config.default_model);
        self.submit(AppTask::llm(model, prompt)).await
    }

    pub async fn ask_model(&self, prompt: &str, model: &str) -> TaskResult {
        self.ask(prompt, Some(model)).await
    }

    /// Fan `prompt` out to every source at once and vote on the outcomes.
    ///
    /// Waits for all sources; a failing or slow source never cancels the
    /// others. Results keep the order the sources were given in.
    pub async fn consensus_call<S: AsRef<str>>(&self, prompt: &str, sources: &[S]) -> ConsensusResult {
        let start = Instant::now();
        let sources: Vec<String> = if sources.is_empty() {
            self.inner.config.default_sources.clone()
        } else {
            sources.iter().map(|s| s.as_ref().to_string()).collect()
        };

        info!(sources = ?sources, "consensus call");

        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let client = self.clone();
                let task = AppTask::llm(source.clone(), prompt);
                tokio::spawn(async move { client.submit(task).await })
            })
            .collect();

        let settled = futures::future::join_all(handles).await;

        let mut per_source = Vec::with_capacity(sources.len());
        for (source, joined) in sources.into_iter().zip(settled) {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(source = %source, "source task aborted: {}", e);
                    let task_id = self.next_task_id().await;
                    let result = TaskResult::failed(
                        ResultData::Text(format!("source task aborted: {}", e)),
                        elapsed_ms(start),
                        task_id,
                    );
                    self.record(result.clone()).await;
                    result
                }
            };
            per_source.push(SourceResult { source, result });
        }

        let outcome = ConsensusResult::aggregate(per_source, elapsed_ms(start));
        info!(
            consensus = %outcome.consensus,
            header = %outcome.header,
            elapsed_ms = outcome.elapsed_ms,
            "consensus reached"
        );
        outcome
    }

    /// Reachability check. Consumes a task id but is not kept in history.
    pub async fn ping(&self) -> TaskResult {
        let task_id = self.next_task_id().await;
        let start = Instant::now();
        let timeout = self.inner.config.timeout();
        let outcome = match tokio::time::timeout(timeout, self.inner.transport.ping()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout(timeout.as_millis() as u64)),
        };
        match outcome {
            Ok(()) => TaskResult::success(ResultData::text("ok"), elapsed_ms(start), task_id),
            Err(e) => TaskResult::failed(ResultData::Text(e.to_string()), elapsed_ms(start), task_id),
        }
    }

    /// Copy of the retained results, oldest first.
    pub async fn history(&self) -> Vec<TaskResult> {
        self.inner.ledger.lock().await.history.snapshot()
    }

    pub async fn stats(&self) -> TaskStats {
        self.inner.ledger.lock().await.history.stats()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
