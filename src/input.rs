// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncBufReadExt;

/// Streams a newline-delimited domain list into the scan queue. Lines are
/// trimmed of surrounding whitespace (including CR), blank lines skipped.
/// An unreadable file is a startup failure.
pub async fn feed_domains(path: &Path, domains: flume::Sender<String>) -> Result<()> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("unable to read input file {}", path.display()))?;
    let reader = tokio::io::BufReader::new(file);
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("error while reading input file {}", path.display()))?
    {
        let domain = line.trim();
        if domain.is_empty() {
            continue;
        }
        if domains.send_async(domain.to_string()).await.is_err() {
            // scan shut down early, nothing left to feed
            break;
        }
    }
    Ok(())
}
