//! HTTP transport for the remote execution service

use crate::transport::{Transport, TransportError, TransportResponse, TransportResult};
use reqwest::Client;
use std::time::Duration;
use ternion_core::{AppTask, ClientConfig, ProtocolHeader, HEADER_FIELD, PROTOCOL_VERSION, VERSION_FIELD};
use tracing::{debug, error};

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> TransportResult<Self> {
        Self::new(config.base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn run_url(&self) -> String {
        format!("{}/run", self.base_url)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, task: &AppTask, header: &ProtocolHeader) -> TransportResult<TransportResponse> {
        debug!(
            "POST {} type={} subject={} header={}",
            self.run_url(),
            task.task_type,
            task.subject,
            header
        );

        let response = self
            .client
            .post(self.run_url())
            .header("content-type", "application/json")
            .header(HEADER_FIELD, header.serialize())
            .header(VERSION_FIELD, PROTOCOL_VERSION)
            .json(task)
            .send()
            .await?;

        let status = response.status();
        let returned_header = response
            .headers()
            .get(HEADER_FIELD)
            .and_then(|v| v.to_str().ok())
            .map(|v| ProtocolHeader::parse(v.trim()));

        let text = response.text().await?;

        if !status.is_success() {
            error!("remote service error {}: {}", status, text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            TransportError::InvalidResponse(format!("undecodable body ({}): {}", e, text))
        })?;

        Ok(TransportResponse {
            body,
            header: returned_header,
        })
    }

    async fn ping(&self) -> TransportResult<()> {
        let response = self.client.get(format!("{}/", self.base_url)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}
