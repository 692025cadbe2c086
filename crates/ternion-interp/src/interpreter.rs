//! Line-oriented stack machine
//!
//! One instruction per line. `;`, `//` and `#` start a comment anywhere
//! outside a quoted literal; evaluation stops at the first terminator.
//! Faults never escape: they end the run with a Failed result carrying the
//! fault description.

use crate::opcode::{trit_literal, Op};
use crate::value::{Number, Value};
use std::collections::HashMap;
use std::time::Instant;
use ternion_core::{ResultData, TaskResult, Trit};
use thiserror::Error;
use tracing::debug;

/// Local evaluations are not numbered by any client.
pub const LOCAL_TASK_ID: u64 = 0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FaultKind {
    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("{0} needs an operand")]
    MissingOperand(Op),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("{op} cannot take {left} and {right}")]
    TypeMismatch {
        op: Op,
        left: &'static str,
        right: &'static str,
    },

    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("integer overflow in {0}")]
    Overflow(Op),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct EvalError {
    pub line: usize,
    pub kind: FaultKind,
}

/// Result of a run plus everything `print` recorded, in order.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result: TaskResult,
    pub output: Vec<String>,
}

/// Per-run state. Created fresh for every evaluation.
#[derive(Default)]
struct Machine {
    stack: Vec<Value>,
    symbols: HashMap<String, Value>,
    output: Vec<String>,
}

enum Flow {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInterpreter;

impl LocalInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, source: &str) -> TaskResult {
        self.eval_with_output(source).result
    }

    pub fn eval_with_output(&self, source: &str) -> Evaluation {
        let start = Instant::now();
        let mut machine = Machine::default();
        let outcome = machine.run(source);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(()) => {
                let data = machine
                    .stack
                    .pop()
                    .map(ResultData::from)
                    .unwrap_or_default();
                TaskResult::success(data, elapsed_ms, LOCAL_TASK_ID)
            }
            Err(e) => {
                debug!(line = e.line, "evaluation fault: {}", e.kind);
                TaskResult::failed(ResultData::Text(e.to_string()), elapsed_ms, LOCAL_TASK_ID)
            }
        };

        Evaluation {
            result,
            output: machine.output,
        }
    }
}

impl Machine {
    fn run(&mut self, source: &str) -> Result<(), EvalError> {
        for (index, raw) in source.split('\n').enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            let flow = self.step(line).map_err(|kind| EvalError {
                line: index + 1,
                kind,
            })?;
            if let Flow::Halt = flow {
                break;
            }
        }
        Ok(())
    }

    fn step(&mut self, line: &str) -> Result<Flow, FaultKind> {
        let (token, rest) = match line.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest.trim()),
            None => (line, ""),
        };
        let op = Op::lookup(token).ok_or_else(|| FaultKind::UnknownInstruction(token.to_string()))?;
        if op.takes_operand() && rest.is_empty() {
            return Err(FaultKind::MissingOperand(op));
        }

        match op {
            Op::Push => {
                let value = parse_literal(rest)?;
                self.stack.push(value);
            }
            Op::Pop => {
                self.stack.pop();
            }
            Op::Dup => {
                if let Some(top) = self.stack.last().cloned() {
                    self.stack.push(top);
                }
            }
            Op::Swap => {
                let n = self.stack.len();
                if n >= 2 {
                    self.stack.swap(n - 1, n - 2);
                }
            }
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => {
                let (a, b) = self.pop_pair();
                let value = arithmetic(op, a, b)?;
                self.stack.push(value);
            }
            Op::Neg => {
                let value = match self.pop() {
                    Value::Int(n) => Value::Int(n.checked_neg().ok_or(FaultKind::Overflow(op))?),
                    Value::Float(f) => Value::Float(-f),
                    Value::Trit(t) => Value::Trit(!t),
                    Value::Text(_) => {
                        return Err(FaultKind::TypeMismatch {
                            op,
                            left: "text",
                            right: "nothing",
                        })
                    }
                };
                self.stack.push(value);
            }
            Op::Print => {
                if let Some(top) = self.stack.last() {
                    self.output.push(top.to_string());
                }
            }
            Op::Store => {
                let value = self.pop();
                self.symbols.insert(rest.to_string(), value);
            }
            Op::Load => {
                let value = self
                    .symbols
                    .get(rest)
                    .cloned()
                    .ok_or_else(|| FaultKind::UndefinedSymbol(rest.to_string()))?;
                self.stack.push(value);
            }
            Op::Clear => self.stack.clear(),
            Op::Eq => {
                let (a, b) = self.pop_pair();
                self.push_bool(a.loose_eq(&b));
            }
            Op::Gt | Op::Lt => {
                let (a, b) = self.pop_pair();
                let ordering = a.compare(&b).ok_or(FaultKind::TypeMismatch {
                    op,
                    left: a.type_name(),
                    right: b.type_name(),
                })?;
                let holds = match op {
                    Op::Gt => ordering.is_gt(),
                    _ => ordering.is_lt(),
                };
                self.push_bool(holds);
            }
            Op::Not => {
                let a = self.pop();
                let t = a.as_trit().ok_or(FaultKind::TypeMismatch {
                    op,
                    left: a.type_name(),
                    right: "nothing",
                })?;
                self.stack.push(Value::Trit(t.not()));
            }
            Op::And | Op::Or => {
                let (a, b) = self.pop_pair();
                let (Some(x), Some(y)) = (a.as_trit(), b.as_trit()) else {
                    return Err(FaultKind::TypeMismatch {
                        op,
                        left: a.type_name(),
                        right: b.type_name(),
                    });
                };
                let t = if op == Op::And { x.and(y) } else { x.or(y) };
                self.stack.push(Value::Trit(t));
            }
            Op::Halt => return Ok(Flow::Halt),
        }
        Ok(Flow::Continue)
    }

    /// Missing operands read as integer 0.
    fn pop(&mut self) -> Value {
        self.stack.pop().unwrap_or_default()
    }

    /// Pops `b` then `a`, so `a op b` reads in push order.
    fn pop_pair(&mut self) -> (Value, Value) {
        let b = self.pop();
        let a = self.pop();
        (a, b)
    }

    fn push_bool(&mut self, holds: bool) {
        let t = if holds { Trit::Success } else { Trit::Failed };
        self.stack.push(Value::Trit(t));
    }
}

fn arithmetic(op: Op, a: Value, b: Value) -> Result<Value, FaultKind> {
    if let (Op::Add, Value::Text(x), Value::Text(y)) = (op, &a, &b) {
        return Ok(Value::Text(format!("{}{}", x, y)));
    }
    let mismatch = || FaultKind::TypeMismatch {
        op,
        left: a.type_name(),
        right: b.type_name(),
    };
    let x = a.as_number().ok_or_else(mismatch)?;
    let y = b.as_number().ok_or_else(mismatch)?;

    if matches!(op, Op::Div | Op::Mod) && y.is_zero() {
        return Ok(Value::Int(0));
    }

    let result = match (x, y) {
        (Number::Int(x), Number::Int(y)) => {
            let n = match op {
                Op::Add => x.checked_add(y),
                Op::Sub => x.checked_sub(y),
                Op::Mul => x.checked_mul(y),
                Op::Div => x.checked_div(y),
                _ => x.checked_rem(y),
            };
            Number::Int(n.ok_or(FaultKind::Overflow(op))?)
        }
        (x, y) => {
            let (x, y) = (x.as_f64(), y.as_f64());
            Number::Float(match op {
                Op::Add => x + y,
                Op::Sub => x - y,
                Op::Mul => x * y,
                Op::Div => x / y,
                _ => x % y,
            })
        }
    };
    Ok(result.into())
}

/// Line text before the first comment marker that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ';' | '#') => return &line[..i],
            (None, '/') if matches!(chars.peek(), Some((_, '/'))) => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Operand of `push`: quoted text, a number, a trit constant, or bare text.
fn parse_literal(raw: &str) -> Result<Value, FaultKind> {
    if let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &raw[1..];
        return match body.find(quote) {
            Some(end) => Ok(Value::Text(body[..end].to_string())),
            None => Err(FaultKind::UnterminatedString),
        };
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Ok(Value::Float(f));
        }
    }
    if let Some(n) = trit_literal(raw) {
        return Ok(Value::Int(n));
    }
    Ok(Value::Text(raw.to_string()))
}
