//! Core types for Ternion

use crate::error::Error;
use crate::header::ProtocolHeader;
use crate::trit::Trit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of work requested from the remote service.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Compile,
    Execute,
    Web,
    Llm,
    Db,
    File,
    System,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Compile => "compile",
            TaskType::Execute => "execute",
            TaskType::Web => "web",
            TaskType::Llm => "llm",
            TaskType::Db => "db",
            TaskType::File => "file",
            TaskType::System => "system",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compile" => Ok(TaskType::Compile),
            "execute" => Ok(TaskType::Execute),
            "web" => Ok(TaskType::Web),
            "llm" => Ok(TaskType::Llm),
            "db" => Ok(TaskType::Db),
            "file" => Ok(TaskType::File),
            "system" => Ok(TaskType::System),
            _ => Err(Error::InvalidTaskType(s.to_string())),
        }
    }
}

/// A unit of work sent to the remote service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppTask {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Actor or model the task is addressed to.
    pub subject: String,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl AppTask {
    pub fn new(task_type: TaskType, subject: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            task_type,
            subject: subject.into(),
            payload: payload.into(),
            params: None,
        }
    }

    pub fn execute(subject: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(TaskType::Execute, subject, source)
    }

    pub fn compile(subject: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(TaskType::Compile, subject, source)
    }

    pub fn llm(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(TaskType::Llm, model, prompt)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Payload carried by a [`TaskResult`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResultData {
    #[default]
    None,
    Integer(i64),
    Float(f64),
    Text(String),
    Trit(Trit),
    Json(serde_json::Value),
}

impl ResultData {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ResultData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultData::None => write!(f, "None"),
            ResultData::Integer(n) => write!(f, "{}", n),
            ResultData::Float(n) => write!(f, "{}", n),
            ResultData::Text(s) => write!(f, "{}", s),
            ResultData::Trit(t) => write!(f, "{}", t),
            ResultData::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ResultData {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for ResultData {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<String> for ResultData {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ResultData {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Trit> for ResultData {
    fn from(t: Trit) -> Self {
        Self::Trit(t)
    }
}

impl From<serde_json::Value> for ResultData {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Outcome of one task. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskResult {
    state: Trit,
    data: ResultData,
    elapsed_ms: u64,
    task_id: u64,
}

impl TaskResult {
    pub fn new(state: Trit, data: ResultData, elapsed_ms: u64, task_id: u64) -> Self {
        Self {
            state,
            data,
            elapsed_ms,
            task_id,
        }
    }

    pub fn success(data: ResultData, elapsed_ms: u64, task_id: u64) -> Self {
        Self::new(Trit::Success, data, elapsed_ms, task_id)
    }

    pub fn pending(data: ResultData, elapsed_ms: u64, task_id: u64) -> Self {
        Self::new(Trit::Pending, data, elapsed_ms, task_id)
    }

    pub fn failed(data: ResultData, elapsed_ms: u64, task_id: u64) -> Self {
        Self::new(Trit::Failed, data, elapsed_ms, task_id)
    }

    pub fn state(&self) -> Trit {
        self.state
    }

    pub fn data(&self) -> &ResultData {
        &self.data
    }

    pub fn into_data(self) -> ResultData {
        self.data
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn task_id(&self) -> u64 {
        self.task_id
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}({}) {} [{}ms]",
            self.task_id,
            self.state,
            self.state.label(),
            self.data,
            self.elapsed_ms
        )
    }
}

/// One source's contribution to a consensus call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SourceResult {
    pub source: String,
    pub result: TaskResult,
}

/// Aggregate of a fan-out consensus call. `per_source` and `trits` are in
/// dispatch order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConsensusResult {
    pub consensus: Trit,
    pub per_source: Vec<SourceResult>,
    pub trits: Vec<Trit>,
    pub header: ProtocolHeader,
    pub elapsed_ms: u64,
}

impl ConsensusResult {
    /// Aggregate per-source results: majority vote in slot 0, the raw
    /// per-source trits in the following slots.
    pub fn aggregate(per_source: Vec<SourceResult>, elapsed_ms: u64) -> Self {
        let trits: Vec<Trit> = per_source.iter().map(|r| r.result.state()).collect();
        let consensus = Trit::consensus(&trits);
        let header =
            ProtocolHeader::from_trits(std::iter::once(consensus).chain(trits.iter().copied()));
        Self {
            consensus,
            per_source,
            trits,
            header,
            elapsed_ms,
        }
    }

    pub fn result_for(&self, source: &str) -> Option<&TaskResult> {
        self.per_source
            .iter()
            .find(|r| r.source == source)
            .map(|r| &r.result)
    }
}

/// Success/Pending/Failed counts over a history.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub success: usize,
    pub pending: usize,
    pub failed: usize,
}

impl TaskStats {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a TaskResult>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut stats, r| {
                stats.total += 1;
                match r.state() {
                    Trit::Success => stats.success += 1,
                    Trit::Pending => stats.pending += 1,
                    Trit::Failed => stats.failed += 1,
                }
                stats
            })
    }
}
