//! Command relay to the automation gateway.
//!
//! One POST per command, one attempt, bounded by the configured timeout.
//! Whatever happens, the caller gets a [`DispatchOutcome`] back; failures are
//! reported, never raised, and never retried here.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::{Command, Config};

// ---

/// Result of a single relay attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    // ---
    pub success: bool,
    /// HTTP status returned by the gateway, absent on transport failure.
    pub status: Option<u16>,
    /// Response body, or the transport error message.
    pub detail: String,
}

impl DispatchOutcome {
    fn failed(status: Option<u16>, detail: String) -> Self {
        DispatchOutcome {
            success: false,
            status,
            detail,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    // ---
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl CommandDispatcher {
    // ---
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build gateway client: {}", e))?;

        Ok(CommandDispatcher {
            client,
            url: url.to_string(),
            timeout,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.gateway_url, cfg.gateway_timeout)
    }

    /// Send `command` to the gateway and report what happened.
    pub async fn dispatch(&self, command: &Command) -> DispatchOutcome {
        // ---
        let payload = command.to_payload();
        info!("Relaying {:?} to gateway {}", command, self.url);

        let response = match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = if e.is_timeout() {
                    format!("gateway did not answer within {:?}", self.timeout)
                } else {
                    e.to_string()
                };
                error!("Gateway request failed for {:?}: {}", command, detail);
                return DispatchOutcome::failed(None, detail);
            }
        };

        let status = response.status();
        let detail = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("unreadable response body: {}", e),
        };

        if status.is_success() {
            info!("Gateway accepted {:?} ({})", command, status);
            DispatchOutcome {
                success: true,
                status: Some(status.as_u16()),
                detail,
            }
        } else {
            error!("Gateway rejected {:?}: {} / {}", command, status, detail);
            DispatchOutcome::failed(Some(status.as_u16()), detail)
        }
    }
}
