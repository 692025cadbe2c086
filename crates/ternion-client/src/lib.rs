//! Ternion Client - task submission and multi-source ternary consensus

pub mod client;
pub mod history;
pub mod http;
pub mod status;
pub mod transport;

pub use client::ConsensusClient;
pub use history::{History, HISTORY_LIMIT};
pub use http::HttpTransport;
pub use status::{parse_status, state_from_response, STATUS_KEYS};
pub use transport::{Transport, TransportError, TransportResponse, TransportResult};
