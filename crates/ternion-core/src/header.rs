//! Protocol header — 9 trit slots carried next to every request and response
//!
//! Wire format: one ASCII character per slot, e.g. `PPPOOOOOO`.
//!
//!   slot 0  state
//!   slot 1  permission
//!   slot 2  consensus
//!   3..=8   reserved
//!
//! Parsing never fails: unknown characters decode as Pending, short input is
//! padded with Pending and anything past the ninth character is dropped.

use crate::trit::Trit;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of slots in every header.
pub const HEADER_SLOTS: usize = 9;

/// Transport-level field that carries the serialized header.
pub const HEADER_FIELD: &str = "X-Ternion-Trit";

/// Transport-level field that carries the protocol version.
pub const VERSION_FIELD: &str = "X-Ternion-Version";

/// Protocol version sent with every request.
pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProtocolHeader {
    slots: [Trit; HEADER_SLOTS],
}

impl Default for ProtocolHeader {
    fn default() -> Self {
        Self::all_pending()
    }
}

impl ProtocolHeader {
    pub fn all_pending() -> Self {
        Self {
            slots: [Trit::Pending; HEADER_SLOTS],
        }
    }

    /// Named slots Success, reserved slots left Pending.
    pub fn all_success() -> Self {
        Self::with_named(Trit::Success)
    }

    /// Named slots Failed, reserved slots left Pending.
    pub fn all_failed() -> Self {
        Self::with_named(Trit::Failed)
    }

    fn with_named(trit: Trit) -> Self {
        let mut header = Self::all_pending();
        header.slots[..3].fill(trit);
        header
    }

    /// Build from any sequence of trits, padding or truncating to 9 slots.
    pub fn from_trits<I>(trits: I) -> Self
    where
        I: IntoIterator<Item = Trit>,
    {
        let mut header = Self::all_pending();
        for (slot, trit) in header.slots.iter_mut().zip(trits) {
            *slot = trit;
        }
        header
    }

    pub fn parse(s: &str) -> Self {
        Self::from_trits(s.chars().map(Trit::from_symbol))
    }

    pub fn serialize(&self) -> String {
        self.slots.iter().map(|t| t.symbol()).collect()
    }

    /// Combined state of all 9 slots. A single Failed slot vetoes the header.
    pub fn overall_state(&self) -> Trit {
        if self.slots.iter().any(|t| t.is_failed()) {
            Trit::Failed
        } else if self.slots.iter().all(|t| t.is_success()) {
            Trit::Success
        } else {
            Trit::Pending
        }
    }

    pub fn slots(&self) -> &[Trit; HEADER_SLOTS] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<Trit> {
        self.slots.get(index).copied()
    }

    /// Overwrite one slot. Out-of-range indices are ignored.
    pub fn set_slot(&mut self, index: usize, trit: Trit) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = trit;
        }
    }

    pub fn state(&self) -> Trit {
        self.slots[0]
    }

    pub fn permission(&self) -> Trit {
        self.slots[1]
    }

    pub fn consensus(&self) -> Trit {
        self.slots[2]
    }
}

impl fmt::Display for ProtocolHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for ProtocolHeader {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for ProtocolHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ProtocolHeader::serialize(self))
    }
}

impl<'de> Deserialize<'de> for ProtocolHeader {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = String::deserialize(deserializer)?;
        Ok(Self::parse(&wire))
    }
}
