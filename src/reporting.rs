// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::types::{DomainFinding, Findings};

/// Log every match of a finding as it comes off the scan queue
pub fn log_matches(finding: &DomainFinding) {
    for m in &finding.matches {
        info!("VULNERABLE: {} {m}", finding.domain);
    }
}

/// End-of-scan summary: how many domains were flagged, re-listing their matches
pub fn print_summary(findings: &Findings) {
    let flagged: Vec<&DomainFinding> = findings
        .findings
        .iter()
        .filter(|f| !f.matches.is_empty())
        .collect();
    let match_count: usize = flagged.iter().map(|f| f.matches.len()).sum();

    if match_count > 0 {
        info!("Vulnerable domains: {} ({} service matches)", flagged.len(), match_count);
    } else {
        info!("Vulnerable domains: {}", flagged.len());
    }
    for finding in flagged {
        log_matches(finding);
    }
}

/// Serialize findings to the JSON result file
pub fn write_results(findings: &Findings, path: &Path) -> Result<()> {
    let data = serde_json::to_string(findings).context("could not serialize results to JSON")?;
    std::fs::write(path, data)
        .with_context(|| format!("could not write results to {}", path.display()))?;
    Ok(())
}
