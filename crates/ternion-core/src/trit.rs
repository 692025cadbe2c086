//! Balanced ternary logic
//!
//! A trit is one of Success (+1), Pending (0) or Failed (-1). Conjunction is
//! the minimum, disjunction the maximum, and `consensus` is a majority vote in
//! which ties and neutral-only inputs resolve to Pending.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued outcome of every operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trit {
    /// +1
    #[serde(rename = "P")]
    Success,
    /// 0
    #[default]
    #[serde(rename = "O")]
    Pending,
    /// -1
    #[serde(rename = "T")]
    Failed,
}

impl Trit {
    pub const ALL: [Trit; 3] = [Trit::Success, Trit::Pending, Trit::Failed];

    pub fn from_signed(n: i64) -> Self {
        match n.signum() {
            1 => Trit::Success,
            -1 => Trit::Failed,
            _ => Trit::Pending,
        }
    }

    pub fn to_signed(self) -> i8 {
        match self {
            Trit::Success => 1,
            Trit::Pending => 0,
            Trit::Failed => -1,
        }
    }

    pub fn not(self) -> Self {
        match self {
            Trit::Success => Trit::Failed,
            Trit::Failed => Trit::Success,
            Trit::Pending => Trit::Pending,
        }
    }

    pub fn and(self, other: Self) -> Self {
        Trit::from_signed(self.to_signed().min(other.to_signed()) as i64)
    }

    pub fn or(self, other: Self) -> Self {
        Trit::from_signed(self.to_signed().max(other.to_signed()) as i64)
    }

    /// Majority vote. Pending entries are counted but never tip the balance.
    pub fn consensus(trits: &[Trit]) -> Trit {
        let (success, failed) = trits.iter().fold((0usize, 0usize), |(p, t), trit| match trit {
            Trit::Success => (p + 1, t),
            Trit::Failed => (p, t + 1),
            Trit::Pending => (p, t),
        });
        if success > failed {
            Trit::Success
        } else if failed > success {
            Trit::Failed
        } else {
            Trit::Pending
        }
    }

    /// Wire symbol: `P`, `O` or `T`.
    pub fn symbol(self) -> char {
        match self {
            Trit::Success => 'P',
            Trit::Pending => 'O',
            Trit::Failed => 'T',
        }
    }

    /// Decode one header character. Unknown characters are Pending.
    pub fn from_symbol(c: char) -> Self {
        match c {
            'P' | '+' | '1' => Trit::Success,
            'T' | '-' => Trit::Failed,
            _ => Trit::Pending,
        }
    }

    /// Localized label used by the remote service.
    pub fn label(self) -> &'static str {
        match self {
            Trit::Success => "성공",
            Trit::Pending => "보류",
            Trit::Failed => "실패",
        }
    }

    pub fn is_success(self) -> bool {
        self == Trit::Success
    }

    pub fn is_pending(self) -> bool {
        self == Trit::Pending
    }

    pub fn is_failed(self) -> bool {
        self == Trit::Failed
    }
}

impl std::ops::Not for Trit {
    type Output = Trit;

    fn not(self) -> Trit {
        Trit::not(self)
    }
}

impl From<i8> for Trit {
    fn from(n: i8) -> Self {
        Trit::from_signed(n as i64)
    }
}

impl From<Trit> for i8 {
    fn from(t: Trit) -> Self {
        t.to_signed()
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
