//! Ternion Core - ternary algebra, protocol header, task types, and config

pub mod config;
pub mod error;
pub mod header;
pub mod trit;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use header::*;
pub use trit::Trit;
pub use types::*;
