// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scan configuration, assembled by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    /// Nameserver (`host:port`) all lookups go through unless rotation is on
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    /// Amount of concurrent scan workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for HTTP probes, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    /// Timeout for a single DNS exchange, in seconds
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout: u64,

    /// Include edge-case fingerprints (more coverage, more false positives)
    #[serde(default)]
    pub include_edge_cases: bool,

    /// Rotate queries across the embedded public resolver list
    #[serde(default)]
    pub rotate_resolvers: bool,

    /// Custom fingerprint catalog, replaces the embedded one
    #[serde(default)]
    pub fingerprints_file: Option<PathBuf>,
}

fn default_nameserver() -> String {
    "8.8.8.8:53".to_string()
}

fn default_workers() -> usize {
    10
}

fn default_http_timeout() -> u64 {
    10
}

fn default_dns_timeout() -> u64 {
    5
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            nameserver: default_nameserver(),
            workers: default_workers(),
            http_timeout: default_http_timeout(),
            dns_timeout: default_dns_timeout(),
            include_edge_cases: false,
            rotate_resolvers: false,
            fingerprints_file: None,
        }
    }
}
