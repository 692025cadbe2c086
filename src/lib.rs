//! ternion — client runtime for the ternary task protocol
//!
//! The library crates do the work; this package wires them to a command line.

pub mod cli;

pub use ternion_client::ConsensusClient;
pub use ternion_core::{ClientConfig, ProtocolHeader, TaskResult, Trit};
pub use ternion_interp::LocalInterpreter;
