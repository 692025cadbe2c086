//! Local evaluation of bilingual stack programs
//!
//! Runs the same source a remote `execute` task would, without a service.
//! Results share the [`TaskResult`](ternion_core::TaskResult) shape used by
//! the client.

pub mod interpreter;
pub mod opcode;
pub mod value;

pub use interpreter::{EvalError, Evaluation, FaultKind, LocalInterpreter, LOCAL_TASK_ID};
pub use opcode::{trit_literal, Op, TOKENS, TRIT_LITERALS};
pub use value::Value;
