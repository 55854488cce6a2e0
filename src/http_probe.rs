// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::time::Duration;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// HTTP probe against a bare hostname: HTTPS first, plain HTTP when that
/// fails. Certificate validation is off on purpose - unclaimed resources
/// routinely present certificates for somebody else's name.
pub struct HttpProber {
    client: reqwest::Client,
    probe_port: Option<u16>,
}

impl HttpProber {
    pub fn new(timeout_secs: u64) -> ScanResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| ScanError::http_probe("probe client", e))?;
        Ok(Self {
            client,
            probe_port: None,
        })
    }

    /// Route probes to a non-standard port (tests, reverse-proxy setups)
    pub fn with_probe_port(mut self, port: u16) -> Self {
        self.probe_port = Some(port);
        self
    }

    /// Status code the domain answers with
    pub async fn get_status(&self, domain: &str) -> ScanResult<u16> {
        let response = self.probe(domain).await?;
        Ok(response.status().as_u16())
    }

    /// Response body of the domain, capped at [`MAX_BODY_SIZE`]
    pub async fn get_body(&self, domain: &str) -> ScanResult<String> {
        let response = self.probe(domain).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScanError::http_probe(domain, e))?;
        let body = if bytes.len() > MAX_BODY_SIZE {
            String::from_utf8_lossy(&bytes[..MAX_BODY_SIZE]).to_string()
        } else {
            String::from_utf8_lossy(&bytes).to_string()
        };
        Ok(body)
    }

    async fn probe(&self, domain: &str) -> ScanResult<reqwest::Response> {
        let mut last_error = None;
        for scheme in ["https", "http"] {
            let url = match self.probe_port {
                Some(port) => format!("{scheme}://{domain}:{port}"),
                None => format!("{scheme}://{domain}"),
            };
            match self.client.get(&url).send().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    debug!("{domain}: {scheme} probe failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(ScanError::http_probe(domain, e)),
            None => Err(ScanError::http_probe(domain, "no probe attempted")),
        }
    }
}
