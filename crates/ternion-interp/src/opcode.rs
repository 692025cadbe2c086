//! Instruction vocabulary
//!
//! Every surface token, Korean or English, maps to one canonical [`Op`].
//! English tokens match case-insensitively. New aliases only need a row in
//! [`TOKENS`]; the evaluator never sees the surface form.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Push,
    Pop,
    Dup,
    Swap,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Print,
    Store,
    Load,
    Clear,
    Eq,
    Gt,
    Lt,
    Not,
    And,
    Or,
    Halt,
}

/// Surface token → operation. English entries are stored upper-case.
pub const TOKENS: &[(&str, Op)] = &[
    ("넣어", Op::Push),
    ("PUSH", Op::Push),
    ("꺼내", Op::Pop),
    ("POP", Op::Pop),
    ("복사", Op::Dup),
    ("DUP", Op::Dup),
    ("바꿔", Op::Swap),
    ("SWAP", Op::Swap),
    ("더해", Op::Add),
    ("더", Op::Add),
    ("ADD", Op::Add),
    ("빼", Op::Sub),
    ("SUB", Op::Sub),
    ("곱해", Op::Mul),
    ("곱", Op::Mul),
    ("MUL", Op::Mul),
    ("나눠", Op::Div),
    ("DIV", Op::Div),
    ("나머지", Op::Mod),
    ("MOD", Op::Mod),
    ("음수", Op::Neg),
    ("NEG", Op::Neg),
    ("보여줘", Op::Print),
    ("PRINT", Op::Print),
    ("SHOW", Op::Print),
    ("저장해", Op::Store),
    ("STORE", Op::Store),
    ("불러와", Op::Load),
    ("LOAD", Op::Load),
    ("비움", Op::Clear),
    ("CLEAR", Op::Clear),
    ("같다", Op::Eq),
    ("EQ", Op::Eq),
    ("크다", Op::Gt),
    ("GT", Op::Gt),
    ("작다", Op::Lt),
    ("LT", Op::Lt),
    ("아니다", Op::Not),
    ("NOT", Op::Not),
    ("그리고", Op::And),
    ("AND", Op::And),
    ("또는", Op::Or),
    ("OR", Op::Or),
    ("종료", Op::Halt),
    ("끝", Op::Halt),
    ("END", Op::Halt),
];

/// Literal words that push a signed trit value (+1 / 0 / -1).
pub const TRIT_LITERALS: &[(&str, i64)] = &[
    ("참", 1),
    ("P", 1),
    ("TRUE", 1),
    ("모름", 0),
    ("O", 0),
    ("UNKNOWN", 0),
    ("거짓", -1),
    ("T", -1),
    ("FALSE", -1),
];

impl Op {
    pub fn lookup(token: &str) -> Option<Op> {
        let token = token.to_ascii_uppercase();
        TOKENS.iter().find(|(t, _)| *t == token).map(|(_, op)| *op)
    }

    /// Every surface token accepted for this operation.
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        TOKENS
            .iter()
            .filter(move |(_, op)| *op == self)
            .map(|(t, _)| *t)
    }

    /// Whether the instruction takes an inline operand after the token.
    pub fn takes_operand(self) -> bool {
        matches!(self, Op::Push | Op::Store | Op::Load)
    }
}

pub fn trit_literal(word: &str) -> Option<i64> {
    let word = word.to_ascii_uppercase();
    TRIT_LITERALS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, n)| *n)
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.aliases().find(|a| a.is_ascii()).unwrap_or("?");
        write!(f, "{}", name)
    }
}
