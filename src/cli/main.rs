// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Kaappari - DNS Takeover Scanner
 * Standalone CLI for subdomain takeover assessment
 *
 * Features:
 * - CNAME/A fingerprint matching against the embedded service catalog
 * - Dangling NS delegation detection (SERVFAIL walk)
 * - CNAME target registration-availability check
 * - JSON result export
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use kaappari::config::ScanConfig;
use kaappari::engine::Engine;
use kaappari::input;
use kaappari::reporting;
use kaappari::scheduler::Scanner;
use kaappari::types::Findings;

/// Kaappari - subdomain takeover assessment tool
#[derive(Parser)]
#[command(name = "kaappari")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Finds dangling CNAME records and unclaimed NS delegations", long_about = None)]
struct Cli {
    /// Single domain to check
    #[arg(short, long)]
    domain: Option<String>,

    /// File containing domains to check
    #[arg(short = 'D', long, default_value = "domains.txt")]
    domains_file: PathBuf,

    /// Server and port to use for name resolution
    #[arg(short, long, default_value = "8.8.8.8:53")]
    nameserver: String,

    /// Rotate queries across the embedded public resolver list
    #[arg(long)]
    public_resolvers: bool,

    /// Amount of concurrent workers
    #[arg(short, long, default_value = "10")]
    workers: usize,

    /// Timeout for HTTP requests, in seconds
    #[arg(short = 't', long, default_value = "10")]
    timeout: u64,

    /// Custom service fingerprints file
    #[arg(short, long)]
    fingerprints: Option<PathBuf>,

    /// Include edge-case fingerprints (might cause false positives)
    #[arg(short, long)]
    edge_cases: bool,

    /// File to write findings to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip summary at the end of the scan
    #[arg(short, long)]
    skip_summary: bool,

    /// Increase application verbosity
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("kaappari-scan")
        .enable_all()
        .build()?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = ScanConfig {
        nameserver: cli.nameserver.clone(),
        workers: cli.workers,
        http_timeout: cli.timeout,
        include_edge_cases: cli.edge_cases,
        rotate_resolvers: cli.public_resolvers,
        fingerprints_file: cli.fingerprints.clone(),
        ..ScanConfig::default()
    };

    if cfg.include_edge_cases {
        info!("Edge-case rules enabled");
    }

    let engine = Engine::new(&cfg).context("unable to set up detection engine")?;
    let (scanner, domains) = Scanner::new(engine, cfg.workers);

    // feed the queue from the single-domain flag or the domains file
    let feeder = if let Some(domain) = cli.domain.clone() {
        info!("Single domain mode ({domain})");
        tokio::spawn(async move {
            let _ = domains.send_async(domain).await;
            Ok::<(), anyhow::Error>(())
        })
    } else {
        info!("Multi domains mode ({})", cli.domains_file.display());
        let path = cli.domains_file.clone();
        tokio::spawn(async move { input::feed_domains(&path, domains).await })
    };

    let findings_rx = scanner.scan();
    let mut collected = Vec::new();
    while let Ok(finding) = findings_rx.recv_async().await {
        reporting::log_matches(&finding);
        if !finding.matches.is_empty() {
            collected.push(finding);
        }
    }
    feeder.await??;
    info!("Scan complete");

    let findings = Findings {
        findings: collected,
    };

    if !cli.skip_summary && cli.domain.is_none() {
        reporting::print_summary(&findings);
    }

    if let Some(output) = &cli.output {
        reporting::write_results(&findings, output).context("unable to write results")?;
        info!("Results written to {}", output.display());
    }

    Ok(())
}
