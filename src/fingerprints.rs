// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Takeover Fingerprint Registry
 * Loads and filters the catalog of known-vulnerable hosting services
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Catalog compiled into the binary; `--fingerprints` replaces it at load time
static DEFAULT_CATALOG: &str = include_str!("../data/fingerprints.json");

/// Marker used by the catalog for rules that are only sometimes exploitable
pub const EDGE_CASE_STATUS: &str = "Edge case";

/// Body patterns too generic to count as strong evidence on their own
const WEAK_PATTERNS: &[&str] = &["404 not found"];

/// Signature of a third-party service whose abandoned resources can be claimed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fingerprint {
    /// CNAME suffixes (or literal A-record IPs) that map a target to this service
    #[serde(rename = "cname", default)]
    pub cnames: Vec<String>,

    /// Substring expected in the HTTP response body of an unclaimed resource
    #[serde(rename = "fingerprint", default)]
    pub pattern: Option<String>,

    /// HTTP status an unclaimed resource answers with; 0 or absent means unset
    #[serde(default)]
    pub http_status: Option<u16>,

    /// Whether an unclaimed resource makes the domain itself NXDOMAIN
    #[serde(default)]
    pub nxdomain: bool,

    #[serde(rename = "service")]
    pub name: String,

    #[serde(default)]
    pub vulnerable: bool,

    #[serde(default)]
    pub status: String,
}

/// How much to trust a match produced by a fingerprint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Unknown,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConfidenceLevel::Unknown => "unknown",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        };
        f.write_str(label)
    }
}

impl Fingerprint {
    pub fn has_cnames(&self) -> bool {
        !self.cnames.is_empty()
    }

    pub fn has_pattern(&self) -> bool {
        self.pattern.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Pattern to search the HTTP body for, if one is declared
    pub fn pattern_str(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Expected HTTP status, if one is declared (0 counts as unset)
    pub fn expected_status(&self) -> Option<u16> {
        self.http_status.filter(|status| *status != 0)
    }

    pub fn is_edge_case(&self) -> bool {
        self.status == EDGE_CASE_STATUS
    }

    /// A fingerprint with no detection criterion at all can never fire
    pub fn is_actionable(&self) -> bool {
        self.has_cnames() || self.has_pattern() || self.expected_status().is_some() || self.nxdomain
    }

    /// Confidence is a pure function of the declared criteria: edge cases and
    /// weak body patterns rank low, a CNAME hint corroborated by a second
    /// signal ranks high, anything else medium.
    pub fn confidence(&self) -> ConfidenceLevel {
        if self.is_edge_case() {
            return ConfidenceLevel::Low;
        }
        if let Some(pattern) = self.pattern_str() {
            if WEAK_PATTERNS.contains(&pattern.to_lowercase().as_str()) {
                return ConfidenceLevel::Low;
            }
        }
        if self.has_cnames()
            && (self.has_pattern() || self.expected_status().is_some() || self.nxdomain)
        {
            return ConfidenceLevel::High;
        }
        ConfidenceLevel::Medium
    }
}

/// Immutable set of actionable fingerprints, loaded once at startup
#[derive(Debug, Clone)]
pub struct Registry {
    fingerprints: Vec<Fingerprint>,
}

impl Registry {
    /// Parse the catalog and keep only fingerprints worth scanning with:
    /// vulnerable services (plus edge cases when requested) that declare at
    /// least one detection criterion. A broken catalog is a startup failure.
    pub fn load(custom_file: Option<&Path>, include_edge_cases: bool) -> Result<Self> {
        let raw = match custom_file {
            Some(path) => {
                info!("Loading fingerprints from {}", path.display());
                std::fs::read_to_string(path)
                    .with_context(|| format!("unable to read {}", path.display()))?
            }
            None => DEFAULT_CATALOG.to_string(),
        };

        let catalog: Vec<Fingerprint> =
            serde_json::from_str(&raw).context("unable to parse fingerprint catalog")?;

        let fingerprints: Vec<Fingerprint> = catalog
            .into_iter()
            .filter(|fp| {
                (fp.vulnerable || (include_edge_cases && fp.is_edge_case())) && fp.is_actionable()
            })
            .collect();

        info!("{} service fingerprints loaded", fingerprints.len());
        Ok(Self { fingerprints })
    }

    pub fn from_fingerprints(fingerprints: Vec<Fingerprint>) -> Self {
        Self { fingerprints }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.fingerprints.iter()
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}
